// SPDX-License-Identifier: GPL-3.0-only

//! Camera access authorization through the XDG Desktop Portal
//!
//! The camera portal works in both native and flatpak environments. Outside a
//! sandbox, a desktop without a camera portal implementation is treated as
//! granting access, since nothing would stop the app from opening the device.

use crate::constants::app_info;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_BUS_NAME: &str = "org.freedesktop.portal.Desktop";
const PORTAL_OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

const PERMISSION_STORE_BUS_NAME: &str = "org.freedesktop.impl.portal.PermissionStore";
const PERMISSION_STORE_PATH: &str = "/org/freedesktop/impl/portal/PermissionStore";
const PERMISSION_TABLE: &str = "devices";
const PERMISSION_ID: &str = "camera";

/// Camera permission as recorded by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Authorized,
    NotDetermined,
    Denied,
}

/// Source of camera permission decisions
pub trait CameraAuthorizer: Send + Sync {
    /// Current permission without prompting the user
    fn status(&self) -> BoxFuture<'static, AuthorizationStatus>;

    /// Prompt the user; resolves to whether access was granted
    fn request(&self) -> BoxFuture<'static, bool>;
}

/// Authorizer that always grants access (CLI and tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct GrantedAuthorizer;

impl CameraAuthorizer for GrantedAuthorizer {
    fn status(&self) -> BoxFuture<'static, AuthorizationStatus> {
        futures::future::ready(AuthorizationStatus::Authorized).boxed()
    }

    fn request(&self) -> BoxFuture<'static, bool> {
        futures::future::ready(true).boxed()
    }
}

/// Authorizer backed by `org.freedesktop.portal.Camera`
#[derive(Debug, Clone)]
pub struct PortalAuthorizer {
    app_id: String,
}

impl PortalAuthorizer {
    /// `app_id` is the key the permission store records decisions under.
    /// Unsandboxed apps are recorded under the empty id.
    pub fn new(app_id: impl Into<String>) -> Self {
        let app_id = if app_info::is_flatpak() {
            app_id.into()
        } else {
            String::new()
        };
        Self { app_id }
    }
}

impl CameraAuthorizer for PortalAuthorizer {
    fn status(&self) -> BoxFuture<'static, AuthorizationStatus> {
        let app_id = self.app_id.clone();
        async move {
            match lookup_permission(&app_id).await {
                Ok(status) => status,
                Err(e) => {
                    debug!(error = %e, "Permission store lookup failed");
                    AuthorizationStatus::NotDetermined
                }
            }
        }
        .boxed()
    }

    fn request(&self) -> BoxFuture<'static, bool> {
        async move {
            match access_camera().await {
                Ok(granted) => {
                    info!(granted, "Camera portal responded");
                    granted
                }
                Err(e) if !app_info::is_flatpak() => {
                    warn!(error = %e, "Camera portal unavailable outside sandbox, assuming access");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "Camera portal request failed");
                    false
                }
            }
        }
        .boxed()
    }
}

/// Read the stored camera decision for `app_id`
async fn lookup_permission(app_id: &str) -> Result<AuthorizationStatus, String> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session D-Bus: {}", e))?;

    let store = zbus::Proxy::new(
        &connection,
        PERMISSION_STORE_BUS_NAME,
        PERMISSION_STORE_PATH,
        PERMISSION_STORE_BUS_NAME,
    )
    .await
    .map_err(|e| format!("Failed to create permission store proxy: {}", e))?;

    let (permissions, _data): (HashMap<String, Vec<String>>, OwnedValue) = store
        .call("Lookup", &(PERMISSION_TABLE, PERMISSION_ID))
        .await
        .map_err(|e| format!("Lookup failed: {}", e))?;

    Ok(status_from_permissions(&permissions, app_id))
}

fn status_from_permissions(
    permissions: &HashMap<String, Vec<String>>,
    app_id: &str,
) -> AuthorizationStatus {
    match permissions
        .get(app_id)
        .and_then(|values| values.first())
        .map(String::as_str)
    {
        Some("yes") => AuthorizationStatus::Authorized,
        Some("no") => AuthorizationStatus::Denied,
        _ => AuthorizationStatus::NotDetermined,
    }
}

/// Call `AccessCamera` and wait for the request's `Response` signal
async fn access_camera() -> Result<bool, String> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session D-Bus: {}", e))?;

    let sender = connection
        .unique_name()
        .map(|name| name.trim_start_matches(':').replace('.', "_"))
        .ok_or("Connection has no unique name")?;
    let token = format!("emotrack_{}", uuid::Uuid::new_v4().simple());
    let request_path = format!("{}/request/{}/{}", PORTAL_OBJECT_PATH, sender, token);

    // Subscribe before the call so the response cannot be missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_BUS_NAME,
        request_path.as_str(),
        REQUEST_INTERFACE,
    )
    .await
    .map_err(|e| format!("Failed to create request proxy: {}", e))?;
    let mut responses = request
        .receive_signal("Response")
        .await
        .map_err(|e| format!("Failed to subscribe to portal response: {}", e))?;

    let camera = zbus::Proxy::new(
        &connection,
        PORTAL_BUS_NAME,
        PORTAL_OBJECT_PATH,
        CAMERA_INTERFACE,
    )
    .await
    .map_err(|e| format!("Failed to create camera portal proxy: {}", e))?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = camera
        .call("AccessCamera", &(options,))
        .await
        .map_err(|e| format!("AccessCamera failed: {}", e))?;
    debug!(handle = %handle, "Camera access requested");

    let message = responses
        .next()
        .await
        .ok_or("Portal closed the request without a response")?;
    let (response, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| format!("Malformed portal response: {}", e))?;

    // 0 = granted, 1 = cancelled by user, 2 = other
    Ok(response == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissions(entries: &[(&str, &str)]) -> HashMap<String, Vec<String>> {
        entries
            .iter()
            .map(|(id, value)| (id.to_string(), vec![value.to_string()]))
            .collect()
    }

    #[test]
    fn test_stored_decisions_map_to_status() {
        let table = permissions(&[("io.emotrack.Emotrack", "yes"), ("", "no")]);
        assert_eq!(
            status_from_permissions(&table, "io.emotrack.Emotrack"),
            AuthorizationStatus::Authorized
        );
        assert_eq!(
            status_from_permissions(&table, ""),
            AuthorizationStatus::Denied
        );
        assert_eq!(
            status_from_permissions(&table, "org.other.App"),
            AuthorizationStatus::NotDetermined
        );
    }

    #[tokio::test]
    async fn test_granted_authorizer() {
        let authorizer = GrantedAuthorizer;
        assert_eq!(authorizer.status().await, AuthorizationStatus::Authorized);
        assert!(authorizer.request().await);
    }
}
