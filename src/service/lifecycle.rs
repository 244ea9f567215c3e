//! Document lifecycle management
//!
//! [`JottService`] is the sole entry point for mutating jotts. It enforces
//! ownership and state preconditions, delegates content shape-checking to
//! [`CardContent`], consults the quota ledger on creation, and issues the
//! persistence operation last, so a failed precondition never leaves partial
//! state behind.

use chrono::{DateTime, Utc};

use super::error::CoreError;
use super::stores::{DocumentStore, ProfileStore, QuotaLedger, Reservation};
use crate::domain::{
    CardContent, Jott, JottId, JottPatch, MonthKey, Profile, Publication, QuotaUsage, UserId,
};

/// The orchestrating core for jott creation, editing, and deletion
pub struct JottService<S, P, Q> {
    documents: S,
    profiles: P,
    quota: Q,
}

impl<S, P, Q> JottService<S, P, Q>
where
    S: DocumentStore,
    P: ProfileStore,
    Q: QuotaLedger,
{
    pub fn new(documents: S, profiles: P, quota: Q) -> Self {
        Self {
            documents,
            profiles,
            quota,
        }
    }

    /// Creates a new draft jott owned by `actor`
    ///
    /// Checks run in order: non-empty title, content shape, quota slot.
    /// Nothing is persisted and no quota is consumed unless every check
    /// passes.
    pub fn create(
        &self,
        actor: &UserId,
        title: &str,
        description: Option<String>,
        raw_content: &str,
    ) -> Result<Jott, CoreError> {
        self.create_at(actor, title, description, raw_content, Utc::now())
    }

    /// Like [`JottService::create`] with the creation instant injected,
    /// which pins the quota month in tests
    pub fn create_at(
        &self,
        actor: &UserId,
        title: &str,
        description: Option<String>,
        raw_content: &str,
        now: DateTime<Utc>,
    ) -> Result<Jott, CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }

        let content = CardContent::parse(raw_content)?;

        let profile = self.profiles.profile(actor)?;
        match self.quota.reserve_slot(actor, profile.monthly_limit, now)? {
            Reservation::Denied { used, limit } => {
                return Err(CoreError::QuotaExceeded { used, limit });
            }
            Reservation::Granted { .. } => {}
        }

        let jott = Jott::new_at(
            JottId::new(title, now),
            actor.clone(),
            title,
            description,
            content,
            now,
        );
        self.documents.insert(&jott)?;

        Ok(jott)
    }

    /// Applies a patch to a jott owned by `actor`
    ///
    /// Ownership is checked before content validation, so a non-owner learns
    /// nothing about the patch's validity. If any field fails validation the
    /// whole update is rejected. A transition into `Published` re-checks the
    /// effective content even when the patch carries no new content.
    pub fn update(
        &self,
        actor: &UserId,
        id: &JottId,
        patch: JottPatch,
    ) -> Result<Jott, CoreError> {
        let mut jott = self.load_owned(actor, id)?;

        if patch.is_empty() {
            return Ok(jott);
        }

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(CoreError::InvalidInput(
                    "title must not be empty".to_string(),
                ));
            }
        }

        let new_content = patch
            .content
            .as_deref()
            .map(CardContent::parse)
            .transpose()?;

        // A stored record edited out of band may hold a non-object payload;
        // publishing must not let it through.
        if patch.publication == Some(Publication::Published) && new_content.is_none() {
            jott.content.ensure_shape()?;
        }

        if let Some(title) = patch.title {
            jott.set_title(title.trim());
        }
        if let Some(description) = patch.description {
            jott.set_description(description);
        }
        if let Some(content) = new_content {
            jott.set_content(content);
        }
        if let Some(publication) = patch.publication {
            jott.set_publication(publication);
        }
        if let Some(visibility) = patch.visibility {
            jott.set_visibility(visibility);
        }

        self.documents.update(&jott)?;

        Ok(jott)
    }

    /// Hard-deletes a jott owned by `actor`
    ///
    /// Quota usage for the owner's month is left unchanged: deleting a jott
    /// does not refund a creation slot.
    pub fn delete(&self, actor: &UserId, id: &JottId) -> Result<(), CoreError> {
        self.load_owned(actor, id)?;

        if !self.documents.remove(id)? {
            return Err(CoreError::NotFound(id.clone()));
        }

        Ok(())
    }

    /// Fetches a single jott
    ///
    /// Owners read their jotts regardless of visibility. Anyone else (or an
    /// anonymous caller) sees only public jotts; a private jott is reported
    /// as not found rather than forbidden, so its existence does not leak.
    pub fn get(&self, actor: Option<&UserId>, id: &JottId) -> Result<Jott, CoreError> {
        let jott = self
            .documents
            .find(id)?
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;

        let owned = actor.map(|a| jott.is_owned_by(a)).unwrap_or(false);
        if owned || jott.is_public() {
            Ok(jott)
        } else {
            Err(CoreError::NotFound(id.clone()))
        }
    }

    /// Lists the jotts owned by `actor`, newest-created first
    pub fn list_owned(&self, actor: &UserId) -> Result<Vec<Jott>, CoreError> {
        let mut jotts = self.documents.list_by_owner(actor)?;
        jotts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        Ok(jotts)
    }

    /// Current-month quota readout for `actor`
    pub fn quota_usage(&self, actor: &UserId) -> Result<QuotaUsage, CoreError> {
        self.quota_usage_at(actor, Utc::now())
    }

    /// Quota readout with the instant injected, which pins the month in tests
    pub fn quota_usage_at(
        &self,
        actor: &UserId,
        now: DateTime<Utc>,
    ) -> Result<QuotaUsage, CoreError> {
        let profile = self.profiles.profile(actor)?;
        let used = self.quota.usage(actor, MonthKey::from_datetime(now))?;
        Ok(QuotaUsage {
            used,
            limit: profile.monthly_limit,
        })
    }

    /// Returns the actor's profile, defaulting to free tier when absent
    pub fn profile(&self, actor: &UserId) -> Result<Profile, CoreError> {
        Ok(self.profiles.profile(actor)?)
    }

    /// Replaces the actor's profile (settings surface)
    pub fn set_profile(&self, actor: &UserId, profile: &Profile) -> Result<(), CoreError> {
        if profile.monthly_limit == 0 {
            return Err(CoreError::InvalidInput(
                "monthly limit must be at least 1".to_string(),
            ));
        }
        Ok(self.profiles.put_profile(actor, profile)?)
    }

    fn load_owned(&self, actor: &UserId, id: &JottId) -> Result<Jott, CoreError> {
        let jott = self
            .documents
            .find(id)?
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;

        if !jott.is_owned_by(actor) {
            return Err(CoreError::Forbidden(id.clone()));
        }

        Ok(jott)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Tier, Visibility};
    use crate::storage::memory::{MemoryJottStore, MemoryProfileStore, MemoryQuotaLedger};

    type TestService = JottService<MemoryJottStore, MemoryProfileStore, MemoryQuotaLedger>;

    fn service() -> TestService {
        JottService::new(
            MemoryJottStore::new(),
            MemoryProfileStore::new(),
            MemoryQuotaLedger::new(),
        )
    }

    fn user(seed: &str) -> UserId {
        UserId::new(seed, Utc::now())
    }

    const CARD: &str = r#"{"type":"AdaptiveCard","body":[{"type":"TextBlock","text":"hi"}]}"#;

    #[test]
    fn create_returns_draft_with_input_fields() {
        let svc = service();
        let owner = user("owner");

        let jott = svc
            .create(&owner, "My Card", Some("A card".to_string()), CARD)
            .unwrap();

        assert_eq!(jott.title, "My Card");
        assert_eq!(jott.description.as_deref(), Some("A card"));
        assert_eq!(jott.owner, owner);
        assert_eq!(jott.publication, Publication::Draft);
        assert_eq!(jott.view_count, 0);
    }

    #[test]
    fn create_then_get_roundtrips() {
        let svc = service();
        let owner = user("owner");

        let created = svc.create(&owner, "Roundtrip", None, CARD).unwrap();
        let fetched = svc.get(Some(&owner), &created.id).unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.content, CardContent::parse(CARD).unwrap());
    }

    #[test]
    fn create_rejects_empty_title_without_side_effects() {
        let svc = service();
        let owner = user("owner");

        let err = svc.create(&owner, "   ", None, CARD).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let usage = svc.quota_usage(&owner).unwrap();
        assert_eq!(usage.used, 0);
        assert!(svc.list_owned(&owner).unwrap().is_empty());
    }

    #[test]
    fn create_rejects_bad_content_before_quota() {
        let svc = service();
        let owner = user("owner");

        let err = svc.create(&owner, "Bad", None, "[1,2]").unwrap_err();
        assert_eq!(err.kind(), "invalid_shape");

        let err = svc.create(&owner, "Worse", None, "{oops").unwrap_err();
        assert_eq!(err.kind(), "malformed_syntax");

        assert_eq!(svc.quota_usage(&owner).unwrap().used, 0);
    }

    #[test]
    fn create_denied_at_quota_ceiling() {
        let svc = service();
        let owner = user("owner");
        svc.set_profile(
            &owner,
            &Profile {
                tier: Tier::Free,
                monthly_limit: 2,
            },
        )
        .unwrap();

        svc.create(&owner, "One", None, CARD).unwrap();
        svc.create(&owner, "Two", None, CARD).unwrap();

        let err = svc.create(&owner, "Three", None, CARD).unwrap_err();
        assert!(matches!(
            err,
            CoreError::QuotaExceeded { used: 2, limit: 2 }
        ));
        assert_eq!(svc.list_owned(&owner).unwrap().len(), 2);
    }

    #[test]
    fn quota_resets_on_month_rollover() {
        let svc = service();
        let owner = user("owner");
        svc.set_profile(
            &owner,
            &Profile {
                tier: Tier::Free,
                monthly_limit: 1,
            },
        )
        .unwrap();

        let march = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 3, 10, 12, 0, 0).unwrap();
        let april = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 4, 1, 0, 0, 0).unwrap();

        svc.create_at(&owner, "March card", None, CARD, march).unwrap();
        let err = svc
            .create_at(&owner, "Over", None, CARD, march)
            .unwrap_err();
        assert!(matches!(err, CoreError::QuotaExceeded { .. }));

        let jott = svc.create_at(&owner, "April card", None, CARD, april).unwrap();
        assert_eq!(jott.title, "April card");
        assert_eq!(
            svc.quota_usage_at(&owner, april).unwrap(),
            QuotaUsage { used: 1, limit: 1 }
        );
    }

    #[test]
    fn delete_does_not_refund_quota() {
        let svc = service();
        let owner = user("owner");

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(svc.create(&owner, format!("Card {}", i).as_str(), None, CARD).unwrap().id);
        }
        for id in &ids {
            svc.delete(&owner, id).unwrap();
        }

        assert_eq!(svc.quota_usage(&owner).unwrap().used, 5);
        assert!(svc.list_owned(&owner).unwrap().is_empty());
    }

    #[test]
    fn delete_then_get_is_not_found() {
        let svc = service();
        let owner = user("owner");

        let jott = svc.create(&owner, "Ephemeral", None, CARD).unwrap();
        svc.delete(&owner, &jott.id).unwrap();

        assert!(matches!(
            svc.get(Some(&owner), &jott.id),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete(&owner, &jott.id),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn update_applies_patch_and_refreshes_updated_at() {
        let svc = service();
        let owner = user("owner");

        let jott = svc.create(&owner, "Before", None, CARD).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));

        let updated = svc
            .update(
                &owner,
                &jott.id,
                JottPatch {
                    title: Some("After".to_string()),
                    description: Some("Edited".to_string()),
                    publication: Some(Publication::Published),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.description.as_deref(), Some("Edited"));
        assert!(updated.is_published());
        assert!(updated.updated_at > jott.updated_at);
        assert_eq!(updated.created_at, jott.created_at);
    }

    #[test]
    fn update_by_non_owner_is_forbidden_and_leaves_state() {
        let svc = service();
        let owner = user("owner");
        let intruder = user("intruder");

        let jott = svc.create(&owner, "Mine", None, CARD).unwrap();

        let err = svc
            .update(
                &intruder,
                &jott.id,
                JottPatch {
                    title: Some("Stolen".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));

        let unchanged = svc.get(Some(&owner), &jott.id).unwrap();
        assert_eq!(unchanged, jott);
    }

    #[test]
    fn ownership_is_checked_before_content_validation() {
        let svc = service();
        let owner = user("owner");
        let intruder = user("intruder");

        let jott = svc.create(&owner, "Mine", None, CARD).unwrap();

        // A non-owner submitting garbage content must see Forbidden, not a
        // validation error
        let err = svc
            .update(
                &intruder,
                &jott.id,
                JottPatch {
                    content: Some("{broken".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }

    #[test]
    fn update_with_invalid_content_writes_nothing() {
        let svc = service();
        let owner = user("owner");

        let jott = svc.create(&owner, "Stable", None, CARD).unwrap();

        let err = svc
            .update(
                &owner,
                &jott.id,
                JottPatch {
                    title: Some("Tainted".to_string()),
                    content: Some("[]".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_shape");

        // The valid title change must not have landed either
        let unchanged = svc.get(Some(&owner), &jott.id).unwrap();
        assert_eq!(unchanged.title, "Stable");
    }

    #[test]
    fn update_rejects_empty_title() {
        let svc = service();
        let owner = user("owner");
        let jott = svc.create(&owner, "Named", None, CARD).unwrap();

        let err = svc
            .update(
                &owner,
                &jott.id,
                JottPatch {
                    title: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn publish_revalidates_stored_content() {
        let svc = service();
        let owner = user("owner");

        let jott = svc.create(&owner, "Corruptible", None, CARD).unwrap();

        // Force a non-object payload past the constructor, simulating a
        // record edited out of band
        let mut forced = jott.clone();
        forced.content = serde_json::from_str("[1,2,3]").unwrap();
        svc.documents.update(&forced).unwrap();

        let err = svc
            .update(
                &owner,
                &jott.id,
                JottPatch {
                    publication: Some(Publication::Published),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_shape");

        // Supplying fresh valid content alongside the toggle succeeds
        let published = svc
            .update(
                &owner,
                &jott.id,
                JottPatch {
                    publication: Some(Publication::Published),
                    content: Some(CARD.to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(published.is_published());
    }

    #[test]
    fn get_hides_private_jotts_from_non_owners() {
        let svc = service();
        let owner = user("owner");
        let other = user("other");

        let jott = svc.create(&owner, "Secret", None, CARD).unwrap();
        svc.update(
            &owner,
            &jott.id,
            JottPatch {
                visibility: Some(Visibility::Private),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(svc.get(Some(&owner), &jott.id).is_ok());
        assert!(matches!(
            svc.get(Some(&other), &jott.id),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(svc.get(None, &jott.id), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn anonymous_get_sees_public_jotts() {
        let svc = service();
        let owner = user("owner");

        let jott = svc.create(&owner, "Open", None, CARD).unwrap();
        let fetched = svc.get(None, &jott.id).unwrap();
        assert_eq!(fetched.id, jott.id);
    }

    #[test]
    fn list_owned_is_newest_first_and_scoped_to_owner() {
        let svc = service();
        let alice = user("alice");
        let bob = user("bob");

        let t1 = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 5, 1, 10, 0, 0).unwrap();
        let t2 = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 5, 2, 10, 0, 0).unwrap();
        let t3 = chrono::TimeZone::with_ymd_and_hms(&Utc, 2025, 5, 3, 10, 0, 0).unwrap();

        svc.create_at(&alice, "Oldest", None, CARD, t1).unwrap();
        svc.create_at(&bob, "Bobs", None, CARD, t2).unwrap();
        svc.create_at(&alice, "Middle", None, CARD, t2).unwrap();
        svc.create_at(&alice, "Newest", None, CARD, t3).unwrap();

        let titles: Vec<_> = svc
            .list_owned(&alice)
            .unwrap()
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(titles, ["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn default_profile_ceiling_is_twenty() {
        let svc = service();
        let owner = user("fresh");

        let usage = svc.quota_usage(&owner).unwrap();
        assert_eq!(usage, QuotaUsage { used: 0, limit: 20 });
        assert_eq!(svc.profile(&owner).unwrap().tier, Tier::Free);
    }

    #[test]
    fn set_profile_rejects_zero_limit() {
        let svc = service();
        let owner = user("owner");

        let err = svc
            .set_profile(
                &owner,
                &Profile {
                    tier: Tier::Pro,
                    monthly_limit: 0,
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }
}
