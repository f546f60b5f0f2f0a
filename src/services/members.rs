//! Member management service

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, MemberQuery, UpdateMember},
    store::Store,
    validate,
};

#[derive(Clone)]
pub struct MembersService {
    store: Store,
}

impl MembersService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// List members with optional filters and sorting
    pub fn list(&self, query: &MemberQuery) -> Vec<Member> {
        let mut members = self.store.members.load();

        if let Some(ref search) = query.search {
            let needle = search.to_lowercase();
            members.retain(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.email.to_lowercase().contains(&needle)
                    || m.phone.contains(&needle)
            });
        }

        match query.sort.as_deref() {
            Some("name") => members.sort_by(|a, b| a.name.cmp(&b.name)),
            _ => members.sort_by(|a, b| a.email.cmp(&b.email)),
        }

        members
    }

    /// Get a member by email
    pub fn get(&self, email: &str) -> AppResult<Member> {
        self.store
            .members
            .get(email)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", email)))
    }

    /// Create a new member
    pub fn create(&self, request: CreateMember) -> AppResult<Member> {
        validate::validate_member(&request)?;

        if self.store.members.get(&request.email).is_some() {
            return Err(AppError::Conflict(format!(
                "Member {} already exists",
                request.email
            )));
        }

        let member = Member {
            email: request.email,
            name: request.name,
            phone: request.phone,
        };
        self.store.members.insert(member.clone())?;

        tracing::info!(email = %member.email, "Member created");
        Ok(member)
    }

    /// Merge updated fields into an existing member
    pub fn update(&self, email: &str, request: UpdateMember) -> AppResult<Member> {
        let updated = self.store.members.update(email, |member| {
            if let Some(name) = request.name {
                member.name = name;
            }
            if let Some(phone) = request.phone {
                member.phone = phone;
            }
        })?;

        if !updated {
            return Err(AppError::NotFound(format!("Member {} not found", email)));
        }
        self.get(email)
    }

    /// Delete a member by email
    pub fn delete(&self, email: &str) -> AppResult<()> {
        if !self.store.members.delete(email)? {
            return Err(AppError::NotFound(format!("Member {} not found", email)));
        }
        tracing::info!(email, "Member deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (MembersService, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path()).unwrap();
        (MembersService::new(store), dir)
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let (members, _dir) = service();
        let request = CreateMember {
            email: "reader@example.com".to_string(),
            name: "Reader".to_string(),
            phone: "555-0100".to_string(),
        };
        members.create(request).unwrap();

        let err = members
            .create(CreateMember {
                email: "reader@example.com".to_string(),
                name: "Other".to_string(),
                phone: "555-0101".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let (members, _dir) = service();
        let err = members
            .create(CreateMember {
                email: "nope".to_string(),
                name: "Reader".to_string(),
                phone: "555-0100".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
