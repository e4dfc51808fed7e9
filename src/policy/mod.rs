//! Route-level authorization rules.
//!
//! The table is built once at startup and never mutated afterwards; changing
//! who can reach what is a redeploy.

use regex::RegexSet;

use crate::core::error::ConfigError;
use crate::session::permission::Permission;

pub(crate) const SIGN_IN: &str = "/sign-in";
pub(crate) const LANDING: &str = "/appointments";
pub(crate) const DOCS: &str = "/docs";
pub(crate) const DOCS_INDEX: &str = "/docs/index.html";

const PUBLIC_ROUTES: &[&str] = &[
    "/sign-in(/.*)?",
    "/sign-up(/.*)?",
    "/verify(/.*)?",
    "/password-recovery(/.*)?",
    "/password-reset(/.*)?",
];

const DOCS_ROUTES: &[&str] = &["/docs(/.*)?"];

// static assets and API calls never reach the gate
const BYPASS_ROUTES: &[&str] = &[
    r"^/_next/static(/.*)?$",
    r"^/_next/image(/.*)?$",
    r"^/api(/.*)?$",
    r"(?i)\.(svg|png|jpe?g|gif|webp|ico)$",
];

const CLIENT_ALLOW: &[&str] = &[
    "/settings(/.*)?",
    "/appointments",
    "/appointments/history",
    "/appointments/create",
    "/appointments/[^/]+",
    "/services",
    "/services/history",
    "/services/[^/]+",
    "/services/[^/]+/[^/]+",
    "/services/[^/]+/[^/]+/[^/]+",
    "/vehicles",
    "/vehicles/create",
    "/vehicles/[^/]+",
    "/vehicles/[^/]+/update",
    "/products/[^/]+",
];

const CLIENT_DENY: &[&str] = &[
    "/services/create",
    "/services/[^/]+/[^/]+/create",
    "/products/create",
];

const WORKER_ALLOW: &[&str] = &[
    "/settings(/.*)?",
    "/appointments",
    "/appointments/history",
    "/appointments/[^/]+",
    "/services",
    "/services/history",
    "/services/[^/]+",
    "/services/[^/]+/[^/]+",
    "/services/[^/]+/[^/]+/create",
    "/services/[^/]+/[^/]+/[^/]+",
    "/vehicles/[^/]+",
    "/products/[^/]+",
];

const WORKER_DENY: &[&str] = &[
    "/appointments/create",
    "/services/create",
    "/vehicles/create",
    "/products/create",
];

/// Anchors a route pattern to the whole path, tolerating one trailing slash.
fn anchored(routes: &[&str]) -> Result<RegexSet, regex::Error> {
    RegexSet::new(routes.iter().map(|route| format!("^{route}/?$")))
}

#[derive(Debug)]
struct RouteSet {
    allow: RegexSet,
    deny: RegexSet,
}

impl RouteSet {
    fn new(allow: &[&str], deny: &[&str]) -> Result<Self, regex::Error> {
        Ok(Self {
            allow: anchored(allow)?,
            deny: anchored(deny)?,
        })
    }

    fn matches(&self, path: &str) -> bool {
        self.allow.is_match(path) && !self.deny.is_match(path)
    }
}

#[derive(Debug)]
pub(crate) struct AccessPolicy {
    public: RegexSet,
    bypass: RegexSet,
    client: RouteSet,
    worker: RouteSet,
    development: bool,
}

impl AccessPolicy {
    /// Compiles the table. In development mode the documentation tree joins
    /// the public routes.
    pub(crate) fn new(development: bool) -> Result<Self, ConfigError> {
        let mut public = PUBLIC_ROUTES.to_vec();
        if development {
            public.extend_from_slice(DOCS_ROUTES);
        }

        Ok(Self {
            public: anchored(&public)?,
            bypass: RegexSet::new(BYPASS_ROUTES)?,
            client: RouteSet::new(CLIENT_ALLOW, CLIENT_DENY)?,
            worker: RouteSet::new(WORKER_ALLOW, WORKER_DENY)?,
            development,
        })
    }

    pub(crate) fn development(&self) -> bool {
        self.development
    }

    pub(crate) fn is_bypassed(&self, path: &str) -> bool {
        self.bypass.is_match(path)
    }

    pub(crate) fn is_public(&self, path: &str) -> bool {
        self.public.is_match(path)
    }

    /// Whether `role` may open `path`. Without a role only public routes are open.
    pub(crate) fn allows(&self, role: Option<Permission>, path: &str) -> bool {
        if self.is_public(path) {
            return true;
        }

        match role {
            Some(Permission::SuperAdmin | Permission::Admin | Permission::Receptionist) => true,
            Some(Permission::Worker) => self.worker.matches(path),
            Some(Permission::Client) => self.client.matches(path),
            None => false,
        }
    }
}
