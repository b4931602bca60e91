//! `has_permission` (§4.6): form ACL resolution. All id comparisons coerce
//! to string form since ACL sets are `HashSet<String>` but `user.id` is a
//! `Uuid` — the invariant §4.6 calls out explicitly.

use auth_identity::{Role, User};
use schema_engine::Form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    View,
    Submit,
    DeleteForm,
    Approve,
    Reject,
}

/// §4.6 step 6 names an `editor or higher on form OR manager system role`
/// clause. The closed role set (§3) has no `manager` entry; `Publisher`
/// (the rung above `Editor`/`Creator`) is treated as that system role.
const MANAGER_EQUIVALENT_ROLE: Role = Role::Publisher;

pub fn has_permission(user: &User, form: &Form, action: Action) -> bool {
    if user.is_admin() {
        return true;
    }
    match action {
        Action::Edit => has_edit_permission(user, form),
        Action::View => has_edit_permission(user, form) || in_set(&form.viewers, user),
        Action::Submit => in_set(&form.submitters, user) || form.is_public,
        Action::DeleteForm => false,
        Action::Approve | Action::Reject => {
            has_edit_permission(user, form) || user.has_role(MANAGER_EQUIVALENT_ROLE)
        }
    }
}

fn has_edit_permission(user: &User, form: &Form) -> bool {
    in_set(&form.editors, user) || form.created_by.to_string() == user.id.to_string()
}

fn in_set(ids: &std::collections::HashSet<String>, user: &User) -> bool {
    ids.contains(&user.id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn user(id: uuid::Uuid, roles: Vec<Role>) -> User {
        User {
            id,
            username: None,
            email: None,
            employee_id: None,
            mobile: None,
            user_type: auth_identity::UserType::Employee,
            password_hash: None,
            password_expiration: None,
            roles,
            failed_login_attempts: 0,
            otp_resend_count: 0,
            lock_until: None,
            otp: None,
            otp_expiration: None,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form(created_by: Uuid, editors: HashSet<String>, submitters: HashSet<String>, is_public: bool) -> Form {
        Form {
            id: Uuid::new_v4(),
            title: "f".to_string(),
            slug: "f".to_string(),
            created_by,
            status: schema_engine::FormStatus::Published,
            is_public,
            expires_at: None,
            editors,
            viewers: HashSet::new(),
            submitters,
            supported_languages: vec!["en".to_string()],
            default_language: "en".to_string(),
            webhooks: Vec::new(),
            notification_emails: Vec::new(),
            versions: Vec::new(),
            active_version: "1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn creator_can_edit_without_being_listed_in_editors() {
        let creator_id = Uuid::new_v4();
        let u = user(creator_id, vec![Role::Creator]);
        let f = form(creator_id, HashSet::new(), HashSet::new(), false);
        assert!(has_permission(&u, &f, Action::Edit));
    }

    #[test]
    fn public_form_allows_anonymous_style_submit_for_any_user() {
        let u = user(Uuid::new_v4(), vec![Role::User]);
        let f = form(Uuid::new_v4(), HashSet::new(), HashSet::new(), true);
        assert!(has_permission(&u, &f, Action::Submit));
    }

    #[test]
    fn private_form_rejects_submit_for_unlisted_user() {
        let u = user(Uuid::new_v4(), vec![Role::User]);
        let f = form(Uuid::new_v4(), HashSet::new(), HashSet::new(), false);
        assert!(!has_permission(&u, &f, Action::Submit));
    }

    #[test]
    fn only_admins_can_delete_a_form() {
        let editor_id = Uuid::new_v4();
        let admin = user(Uuid::new_v4(), vec![Role::Admin]);
        let editor = user(editor_id, vec![Role::Editor]);
        let mut editors = HashSet::new();
        editors.insert(editor_id.to_string());
        let f = form(Uuid::new_v4(), editors, HashSet::new(), false);
        assert!(has_permission(&admin, &f, Action::DeleteForm));
        assert!(!has_permission(&editor, &f, Action::DeleteForm));
    }

    #[test]
    fn publisher_role_can_approve_without_form_edit_access() {
        let u = user(Uuid::new_v4(), vec![Role::Publisher]);
        let f = form(Uuid::new_v4(), HashSet::new(), HashSet::new(), false);
        assert!(has_permission(&u, &f, Action::Approve));
    }
}
