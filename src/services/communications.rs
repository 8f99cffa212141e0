//! Communications service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        communication::{Communication, CommunicationInput, CommunicationQuery},
        enums::CommunicationStatus,
        user::UserClaims,
    },
    repository::{communications::Counter, Repository},
};

#[derive(Clone)]
pub struct CommunicationsService {
    repository: Repository,
}

impl CommunicationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &CommunicationQuery) -> AppResult<Vec<Communication>> {
        self.repository.communications.list(query).await
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Communication> {
        self.repository.communications.get_by_id(id).await
    }

    async fn check_office(&self, office_id: i64) -> AppResult<()> {
        if !self.repository.offices.exists(office_id).await? {
            return Err(AppError::NotFound(format!("Office {} not found", office_id)));
        }
        Ok(())
    }

    fn ensure_author_or_reviewer(claims: &UserClaims, comm: &Communication) -> AppResult<()> {
        if claims.role.can_review() || comm.author_id == Some(claims.user_id) {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Only the author or a reviewer can modify this communication".to_string(),
            ))
        }
    }

    pub async fn create(&self, claims: &UserClaims, data: &CommunicationInput) -> AppResult<Communication> {
        data.validate()?;
        self.check_office(data.office_id).await?;
        let comm = self
            .repository
            .communications
            .create(data, claims.user_id, &claims.sub)
            .await?;
        tracing::info!(communication_id = comm.id, author_id = claims.user_id, "Communication created");
        Ok(comm)
    }

    pub async fn update(&self, claims: &UserClaims, id: i64, data: &CommunicationInput) -> AppResult<Communication> {
        data.validate()?;
        let current = self.repository.communications.get_by_id(id).await?;
        Self::ensure_author_or_reviewer(claims, &current)?;
        self.check_office(data.office_id).await?;

        let status = match data.status {
            Some(s) if s != current.status => {
                claims.require_reviewer()?;
                s
            }
            _ => current.status,
        };
        let published_at = published_at_for(status, current.published_at);

        self.repository
            .communications
            .update(id, data, status, published_at)
            .await
    }

    /// Any state -> PUBLISHED
    pub async fn approve(&self, claims: &UserClaims, id: i64) -> AppResult<Communication> {
        claims.require_reviewer()?;
        let current = self.repository.communications.get_by_id(id).await?;
        let comm = self
            .repository
            .communications
            .set_review_state(
                id,
                CommunicationStatus::Published,
                None,
                published_at_for(CommunicationStatus::Published, current.published_at),
                Some(claims.user_id),
            )
            .await?;
        tracing::info!(communication_id = id, "Communication published");
        Ok(comm)
    }

    pub async fn reject(&self, claims: &UserClaims, id: i64, reason: &str) -> AppResult<Communication> {
        claims.require_reviewer()?;
        let reason = required_reason(reason)?;
        let current = self.repository.communications.get_by_id(id).await?;
        self.repository
            .communications
            .set_review_state(id, CommunicationStatus::Rejected, Some(reason), current.published_at, None)
            .await
    }

    /// PUBLISHED -> NEEDS_REVISION
    pub async fn unapprove(&self, claims: &UserClaims, id: i64, reason: &str) -> AppResult<Communication> {
        claims.require_reviewer()?;
        let reason = required_reason(reason)?;
        let current = self.repository.communications.get_by_id(id).await?;
        if current.status != CommunicationStatus::Published {
            return Err(AppError::InvalidState(
                "Only published communications can be unapproved".to_string(),
            ));
        }
        self.repository
            .communications
            .set_review_state(id, CommunicationStatus::NeedsRevision, Some(reason), None, None)
            .await
    }

    /// DRAFT or NEEDS_REVISION -> PENDING; other states are left alone
    pub async fn submit(&self, claims: &UserClaims, id: i64) -> AppResult<Communication> {
        let current = self.repository.communications.get_by_id(id).await?;
        Self::ensure_author_or_reviewer(claims, &current)?;

        let next = current.status.submit();
        if next == current.status {
            return Ok(current);
        }
        self.repository
            .communications
            .set_review_state(id, next, None, current.published_at, None)
            .await
    }

    pub async fn share(&self, id: i64) -> AppResult<Communication> {
        self.repository.communications.increment(id, Counter::Shares).await
    }

    pub async fn view(&self, id: i64) -> AppResult<Communication> {
        self.repository.communications.increment(id, Counter::Views).await
    }

    pub async fn delete(&self, claims: &UserClaims, id: i64) -> AppResult<()> {
        let current = self.repository.communications.get_by_id(id).await?;
        if !(claims.is_admin() || current.author_id == Some(claims.user_id)) {
            return Err(AppError::Authorization(
                "Only the author or an administrator can delete this communication".to_string(),
            ));
        }
        self.repository.communications.delete(id).await
    }
}

/// Publication timestamp after moving to `status`: stamped once on publish,
/// cleared when the item leaves the published state.
fn published_at_for(
    status: CommunicationStatus,
    current: Option<chrono::DateTime<Utc>>,
) -> Option<chrono::DateTime<Utc>> {
    match status {
        CommunicationStatus::Published => current.or_else(|| Some(Utc::now())),
        _ => None,
    }
}

fn required_reason(reason: &str) -> AppResult<&str> {
    let reason = reason.trim();
    if reason.is_empty() {
        Err(AppError::Validation("A reason is required".to_string()))
    } else {
        Ok(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_at_stamped_once() {
        let first = published_at_for(CommunicationStatus::Published, None);
        assert!(first.is_some());
        assert_eq!(published_at_for(CommunicationStatus::Published, first), first);
        assert_eq!(published_at_for(CommunicationStatus::NeedsRevision, first), None);
    }

    #[test]
    fn test_reason_required() {
        assert!(required_reason("   ").is_err());
        assert_eq!(required_reason(" off-topic ").unwrap(), "off-topic");
    }
}
