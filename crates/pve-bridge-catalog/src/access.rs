// crates/pve-bridge-catalog/src/access.rs
// ============================================================================
// Module: Access Control Tools
// Description: Users, groups, roles, and access control list management.
// Purpose: Enumerate access-control capabilities.
// Dependencies: pve-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Identity and ACL inspection sits at `read-only`; managing users and ACL
//! entries requires `full`. User creation deliberately takes no password
//! field; credential material never flows through tool input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pve_bridge_core::AccessTier;
use pve_bridge_core::CapabilityDefinition;
use serde_json::Map;
use serde_json::Value;

use crate::args;
use crate::define::destructive;
use crate::define::tool;
use crate::schema;

/// Category label for access control tools.
const CATEGORY: &str = "access";

/// Capability definitions for access control management.
pub(crate) fn definitions() -> Vec<CapabilityDefinition> {
    vec![
        tool(
            "list_users",
            "List user accounts known to the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/access/users").await?) }),
        ),
        tool(
            "get_user",
            "Read one user account.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::object(
                &[("userid", schema::string("User identifier, for example ops@pve"))],
                &["userid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let userid = args::segment(&input, "userid")?;
                    args::render(&api.get(&format!("/access/users/{userid}")).await?)
                })
            },
        ),
        tool(
            "list_groups",
            "List user groups known to the cluster.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/access/groups").await?) }),
        ),
        tool(
            "list_roles",
            "List roles and the privileges they grant.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/access/roles").await?) }),
        ),
        tool(
            "get_acl",
            "Read the access control list.",
            AccessTier::ReadOnly,
            CATEGORY,
            schema::empty(),
            |api, _input| Box::pin(async move { args::render(&api.get("/access/acl").await?) }),
        ),
        tool(
            "create_user",
            "Create a user account. Set the password or token out of band.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("userid", schema::string("User identifier, for example ops@pve")),
                    ("comment", schema::string("Free-form account comment")),
                    ("email", schema::string("Contact email address")),
                    ("firstname", schema::string("Given name")),
                    ("lastname", schema::string("Family name")),
                    ("groups", schema::string("Comma-separated groups to join")),
                    ("expire", schema::integer("Account expiry as a Unix timestamp, 0 for never")),
                    ("enable", schema::boolean("Whether the account starts enabled")),
                ],
                &["userid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let userid = args::segment(&input, "userid")?;
                    let mut body = Map::new();
                    body.insert("userid".to_string(), Value::from(userid));
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["comment", "email", "firstname", "lastname", "groups", "expire", "enable"],
                    );
                    args::render(&api.post("/access/users", Some(Value::Object(body))).await?)
                })
            },
        ),
        tool(
            "update_user",
            "Update a user account's details or group membership.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("userid", schema::string("User identifier")),
                    ("comment", schema::string("New account comment")),
                    ("email", schema::string("New contact email address")),
                    ("firstname", schema::string("New given name")),
                    ("lastname", schema::string("New family name")),
                    ("groups", schema::string("Comma-separated replacement group list")),
                    ("expire", schema::integer("New expiry as a Unix timestamp, 0 for never")),
                    ("enable", schema::boolean("Enable or disable the account")),
                ],
                &["userid"],
            ),
            |api, input| {
                Box::pin(async move {
                    let userid = args::segment(&input, "userid")?;
                    let mut body = Map::new();
                    args::copy_fields(
                        &mut body,
                        &input,
                        &["comment", "email", "firstname", "lastname", "groups", "expire", "enable"],
                    );
                    args::render(
                        &api.put(&format!("/access/users/{userid}"), Some(Value::Object(body)))
                            .await?,
                    )
                })
            },
        ),
        destructive(
            "delete_user",
            "Delete a user account and its ACL entries.",
            AccessTier::Full,
            CATEGORY,
            schema::object(&[("userid", schema::string("User identifier"))], &["userid"]),
            |api, input| {
                Box::pin(async move {
                    let userid = args::segment(&input, "userid")?;
                    args::render(&api.delete(&format!("/access/users/{userid}")).await?)
                })
            },
        ),
        tool(
            "update_acl",
            "Grant or revoke a role on an access control path.",
            AccessTier::Full,
            CATEGORY,
            schema::object(
                &[
                    ("path", schema::string("Access control path, for example /vms/100")),
                    ("roles", schema::string("Comma-separated roles to grant or revoke")),
                    ("users", schema::string("Comma-separated user identifiers")),
                    ("groups", schema::string("Comma-separated group identifiers")),
                    ("delete", schema::boolean("Revoke the listed roles instead of granting them")),
                ],
                &["path", "roles"],
            ),
            |api, input| {
                Box::pin(async move {
                    let path = args::string(&input, "path")?;
                    let roles = args::string(&input, "roles")?;
                    let mut body = Map::new();
                    body.insert("path".to_string(), Value::from(path));
                    body.insert("roles".to_string(), Value::from(roles));
                    args::copy_fields(&mut body, &input, &["users", "groups", "delete"]);
                    args::render(&api.put("/access/acl", Some(Value::Object(body))).await?)
                })
            },
        ),
    ]
}
