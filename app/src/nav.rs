//! Role-dependent navbar model.

use newsroom_shared::{Role, RoleSet};

use crate::Session;

/// Links the navbar shows for the current session. Purely advisory:
/// hiding a link is a courtesy, the policy layer is what actually says
/// no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavModel {
    pub show_create_post: bool,
    pub show_admin_panel: bool,
    pub auth_entry: AuthEntry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEntry {
    Login,
    Logout { email: String },
}

pub fn navbar(session: &Session) -> NavModel {
    let auth_entry = match &session.identity {
        Some(identity) => AuthEntry::Logout {
            email: identity.email.clone(),
        },
        None => AuthEntry::Login,
    };
    NavModel {
        show_create_post: session.authorize(RoleSet::EDITORIAL).is_allowed(),
        show_admin_panel: session.role == Role::Admin && session.is_authenticated(),
        auth_entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_shared::Identity;

    fn session(role: Role, signed_in: bool) -> Session {
        Session {
            identity: signed_in.then(|| Identity {
                id: "u1".into(),
                email: "user@example.com".into(),
            }),
            role,
        }
    }

    #[test]
    fn anonymous_sees_login_only() {
        let nav = navbar(&session(Role::Reader, false));
        assert_eq!(nav.auth_entry, AuthEntry::Login);
        assert!(!nav.show_create_post);
        assert!(!nav.show_admin_panel);
    }

    #[test]
    fn editor_gets_create_post_but_not_admin_panel() {
        let nav = navbar(&session(Role::Editor, true));
        assert!(nav.show_create_post);
        assert!(!nav.show_admin_panel);
    }

    #[test]
    fn admin_gets_both_links_and_logout() {
        let nav = navbar(&session(Role::Admin, true));
        assert!(nav.show_create_post);
        assert!(nav.show_admin_panel);
        assert_eq!(
            nav.auth_entry,
            AuthEntry::Logout {
                email: "user@example.com".into()
            }
        );
    }
}
