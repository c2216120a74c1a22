use std::sync::Arc;
use chrono::{DateTime, Utc};
use crate::domain::models::event::{access_mode, page_visibility, Event};
use crate::domain::models::invitee::Invitee;
use crate::domain::models::rsvp::RsvpToken;
use crate::domain::ports::{InviteeRepository, RsvpTokenRepository};
use crate::error::AppError;

/// How an RSVP submission was authorized. The ledger needs this to know
/// whether a token must be consumed alongside the response write.
#[derive(Debug)]
pub enum RsvpGrant {
    /// Event has PUBLIC access; no credential was checked.
    Open,
    /// A valid, unconsumed token was presented.
    Token(RsvpToken),
    /// The supplied email has a standing invitation.
    Invitee(Invitee),
}

#[derive(Debug)]
pub enum RsvpAccess {
    Granted(RsvpGrant),
    /// Denied with the machine-distinguishable invite-only reason.
    InviteOnly,
}

/// Central access decision engine: answers "may view the detail page" and
/// "may submit an RSVP" from one place so the two can never diverge.
/// All checks are read-only; tokens are consumed only on a successful
/// ledger write, never here.
pub struct AccessPolicy {
    invitee_repo: Arc<dyn InviteeRepository>,
    token_repo: Arc<dyn RsvpTokenRepository>,
}

impl AccessPolicy {
    pub fn new(
        invitee_repo: Arc<dyn InviteeRepository>,
        token_repo: Arc<dyn RsvpTokenRepository>,
    ) -> Self {
        Self { invitee_repo, token_repo }
    }

    /// Page visibility never consults tokens: tokens gate RSVP submission
    /// only. A PRIVATE page is visible to the owner and standing invitees.
    pub async fn can_view_page(
        &self,
        event: &Event,
        requester_email: Option<&str>,
    ) -> Result<bool, AppError> {
        if event.page_visibility == page_visibility::PUBLIC {
            return Ok(true);
        }

        let email = match requester_email {
            Some(email) => email,
            None => return Ok(false),
        };

        if event.is_owner(email) {
            return Ok(true);
        }

        let invitee = self
            .invitee_repo
            .find_by_event_and_email(&event.id, &email.to_lowercase())
            .await?;
        Ok(invitee.is_some())
    }

    /// PUBLIC access grants unconditionally. PRIVATE access grants via a
    /// live token for this event, or via a standing invitation for the
    /// supplied email. Denial is a normal return value, not an error.
    pub async fn can_submit_rsvp(
        &self,
        event: &Event,
        token: Option<&str>,
        email: Option<&str>,
    ) -> Result<RsvpAccess, AppError> {
        if event.access_mode == access_mode::PUBLIC {
            return Ok(RsvpAccess::Granted(RsvpGrant::Open));
        }

        if let Some(raw) = token {
            if let Some(found) = self.token_repo.find_by_token(raw).await? {
                if token_grants(&found, &event.id, email, Utc::now()) {
                    return Ok(RsvpAccess::Granted(RsvpGrant::Token(found)));
                }
            }
        }

        if let Some(email) = email {
            if let Some(invitee) = self
                .invitee_repo
                .find_by_event_and_email(&event.id, &email.to_lowercase())
                .await?
            {
                return Ok(RsvpAccess::Granted(RsvpGrant::Invitee(invitee)));
            }
        }

        Ok(RsvpAccess::InviteOnly)
    }

    /// Owner authorization is the caller's responsibility.
    pub async fn issue_token(
        &self,
        event: &Event,
        email: Option<String>,
    ) -> Result<RsvpToken, AppError> {
        let token = RsvpToken::new(event.id.clone(), email);
        self.token_repo.create(&token).await
    }
}

/// Pure token validity check: right event, unconsumed, unexpired, and
/// either unbound or bound to the supplied email (case-insensitive).
pub fn token_grants(
    token: &RsvpToken,
    event_id: &str,
    email: Option<&str>,
    now: DateTime<Utc>,
) -> bool {
    if token.event_id != event_id {
        return false;
    }
    if token.used_at.is_some() {
        return false;
    }
    if now >= token.expires_at {
        return false;
    }
    match &token.email {
        None => true,
        Some(bound) => email.is_some_and(|e| bound.eq_ignore_ascii_case(e)),
    }
}
