use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Role labels carried in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum Permission {
    SuperAdmin,
    Admin,
    Receptionist,
    Worker,
    Client,
}

impl Permission {
    /// Highest precedence first.
    pub(crate) const PRECEDENCE: [Permission; 5] = [
        Permission::SuperAdmin,
        Permission::Admin,
        Permission::Receptionist,
        Permission::Worker,
        Permission::Client,
    ];
}

impl Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Permission::SuperAdmin => "superAdmin",
                Permission::Admin => "admin",
                Permission::Receptionist => "receptionist",
                Permission::Worker => "worker",
                Permission::Client => "client",
            }
        )
    }
}

/// Insertion-ordered set of permission labels.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct Permissions(Vec<Permission>);

impl Permissions {
    /// Maps the backend's user type (and worker sub-type) to permission labels.
    ///
    /// Comparison is case-insensitive. Unknown user types yield an empty set,
    /// which leaves the holder with access to public routes only.
    pub(crate) fn derive(user_type: &str, worker_type: Option<&str>) -> Self {
        let permission = if user_type.eq_ignore_ascii_case("SUPERADMIN") {
            Some(Permission::SuperAdmin)
        } else if user_type.eq_ignore_ascii_case("ADMIN") {
            Some(Permission::Admin)
        } else if user_type.eq_ignore_ascii_case("CLIENT") {
            Some(Permission::Client)
        } else if user_type.eq_ignore_ascii_case("WORKER") {
            match worker_type {
                Some(sub) if sub.eq_ignore_ascii_case("RECEPTIONIST") => {
                    Some(Permission::Receptionist)
                }
                _ => Some(Permission::Worker),
            }
        } else {
            None
        };

        permission.into_iter().collect()
    }

    pub(crate) fn insert(&mut self, permission: Permission) {
        if !self.contains(permission) {
            self.0.push(permission);
        }
    }

    pub(crate) fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// The single highest-precedence label present, if any.
    pub(crate) fn role(&self) -> Option<Permission> {
        Permission::PRECEDENCE
            .into_iter()
            .find(|permission| self.contains(*permission))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for Permissions {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut permissions = Permissions::default();
        for permission in iter {
            permissions.insert(permission);
        }
        permissions
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Vec::<Permission>::deserialize(deserializer)?
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(permissions: &Permissions) -> Vec<Permission> {
        permissions.0.clone()
    }

    #[test]
    fn test_derive_single_role_types() {
        assert_eq!(
            labels(&Permissions::derive("SUPERADMIN", None)),
            vec![Permission::SuperAdmin]
        );
        assert_eq!(
            labels(&Permissions::derive("ADMIN", None)),
            vec![Permission::Admin]
        );
        assert_eq!(
            labels(&Permissions::derive("CLIENT", None)),
            vec![Permission::Client]
        );
    }

    #[test]
    fn test_derive_worker_sub_types() {
        assert_eq!(
            labels(&Permissions::derive("WORKER", Some("RECEPTIONIST"))),
            vec![Permission::Receptionist]
        );
        assert_eq!(
            labels(&Permissions::derive("WORKER", Some("MECHANIC"))),
            vec![Permission::Worker]
        );
        assert_eq!(
            labels(&Permissions::derive("WORKER", None)),
            vec![Permission::Worker]
        );
    }

    #[test]
    fn test_derive_is_case_insensitive_and_deterministic() {
        let first = Permissions::derive("worker", Some("Receptionist"));
        let second = Permissions::derive("WoRkEr", Some("receptionist"));

        assert_eq!(first, second);
        assert_eq!(labels(&first), vec![Permission::Receptionist]);
        assert_eq!(
            Permissions::derive("superAdmin", None),
            Permissions::derive("SUPERADMIN", None)
        );
    }

    #[test]
    fn test_derive_ignores_sub_type_for_non_workers() {
        assert_eq!(
            labels(&Permissions::derive("ADMIN", Some("RECEPTIONIST"))),
            vec![Permission::Admin]
        );
    }

    #[test]
    fn test_derive_unknown_type_is_empty() {
        let permissions = Permissions::derive("GUEST", None);
        assert!(permissions.is_empty());
        assert_eq!(permissions.role(), None);
    }

    #[test]
    fn test_role_follows_precedence() {
        let permissions: Permissions = [Permission::Worker, Permission::Receptionist]
            .into_iter()
            .collect();
        assert_eq!(permissions.role(), Some(Permission::Receptionist));

        let permissions: Permissions = [Permission::Client, Permission::SuperAdmin, Permission::Admin]
            .into_iter()
            .collect();
        assert_eq!(permissions.role(), Some(Permission::SuperAdmin));
    }

    #[test]
    fn test_insert_keeps_order_and_drops_duplicates() {
        let permissions: Permissions = [
            Permission::Worker,
            Permission::Receptionist,
            Permission::Worker,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            labels(&permissions),
            vec![Permission::Worker, Permission::Receptionist]
        );
    }

    #[test]
    fn test_labels_serialize_as_camel_case() {
        let permissions: Permissions = [Permission::SuperAdmin, Permission::Receptionist]
            .into_iter()
            .collect();

        assert_eq!(
            serde_json::to_string(&permissions).unwrap(),
            r#"["superAdmin","receptionist"]"#
        );

        let decoded: Permissions =
            serde_json::from_str(r#"["client","client","admin"]"#).unwrap();
        assert_eq!(labels(&decoded), vec![Permission::Client, Permission::Admin]);
    }

    #[test]
    fn test_display_matches_wire_label() {
        assert_eq!(Permission::SuperAdmin.to_string(), "superAdmin");
        assert_eq!(Permission::Client.to_string(), "client");
    }
}
