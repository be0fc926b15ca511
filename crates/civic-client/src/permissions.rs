//! Client-side ownership checks
//!
//! The backend enforces access control; these only decide which actions a
//! view offers. Owners and admins may edit or delete.

use civic_session::User;

use crate::models::{Comment, Report};

pub fn can_modify_comment(user: Option<&User>, comment: &Comment) -> bool {
    is_owner_or_admin(user, comment.user_id.as_deref())
}

pub fn can_modify_report(user: Option<&User>, report: &Report) -> bool {
    is_owner_or_admin(user, report.reporter_id.as_deref())
}

fn is_owner_or_admin(user: Option<&User>, owner_id: Option<&str>) -> bool {
    match user {
        Some(user) if user.is_admin() => true,
        Some(user) => owner_id.is_some_and(|owner| owner == user.id),
        None => false,
    }
}
