//! Role → path tables: API endpoint candidates and navigation targets.
//!
//! Everything here is pure. Navigation targets are prefixed with the app
//! base path so the portal works at a domain root or under a sub-path.

use configs::NavigationConfig;
use models::{normalize_role, Role, RoleName};

pub const HOME_ROUTE: &str = "/index.html";

const STUDENT_LOGIN: &[&str] = &["/auth/student/login", "/auth/user/login", "/auth/login"];
const DEPARTMENT_LOGIN: &[&str] = &["/auth/department/login"];
const ADMIN_LOGIN: &[&str] = &["/auth/admin/login"];
const GENERIC_LOGIN: &[&str] = &["/auth/login"];

const STUDENT_REGISTER: &[&str] = &["/auth/student/register", "/auth/user/register", "/auth/register"];
const DEPARTMENT_REGISTER: &[&str] = &["/auth/department/register", "/auth/register"];
const ADMIN_REGISTER: &[&str] = &["/auth/admin/register"];
const GENERIC_REGISTER: &[&str] = &["/auth/register"];

const ROOT_MARKERS: &[&str] = &["/pages/", "/assets/", "/src/", "/index.html", "/register.html"];

/// Absent role means the student flow; an unrecognized one gets `None`.
fn role_or_student(role: Option<&str>) -> Option<Role> {
    match normalize_role(role) {
        None => Some(Role::Student),
        Some(name) => name.known(),
    }
}

/// Ordered login candidates for a role.
pub fn login_endpoints(role: Option<&str>) -> &'static [&'static str] {
    match role_or_student(role) {
        Some(Role::Student) => STUDENT_LOGIN,
        Some(Role::Department) => DEPARTMENT_LOGIN,
        Some(Role::Admin) => ADMIN_LOGIN,
        None => GENERIC_LOGIN,
    }
}

/// Ordered registration candidates for a role.
pub fn register_endpoints(role: Option<&str>) -> &'static [&'static str] {
    match role_or_student(role) {
        Some(Role::Student) => STUDENT_REGISTER,
        Some(Role::Department) => DEPARTMENT_REGISTER,
        Some(Role::Admin) => ADMIN_REGISTER,
        None => GENERIC_REGISTER,
    }
}

pub fn dashboard_route(role: Role) -> &'static str {
    match role {
        Role::Student => "/pages/user/dashboard.html",
        Role::Department => "/pages/department/dashboard.html",
        Role::Admin => "/pages/admin/dashboard.html",
    }
}

pub fn login_route(role: Role) -> &'static str {
    match role {
        Role::Student => "/pages/user/login.html",
        Role::Department => "/pages/department/login.html",
        Role::Admin => "/pages/admin/login.html",
    }
}

/// Derive the hosting prefix from the current location.
///
/// `/repo/pages/user/login.html` → `/repo`; `/repo/` → `/repo`;
/// `<user>.github.io/repo` → `/repo`; `localhost/frontend` → `/frontend`.
pub fn app_base_path(hostname: &str, pathname: &str) -> String {
    let path = if pathname.is_empty() { "/" } else { pathname };

    for marker in ROOT_MARKERS {
        if let Some(idx) = path.find(marker) {
            if idx > 0 {
                return path[..idx].to_string();
            }
        }
    }

    if path.ends_with('/') && path != "/" {
        return path[..path.len() - 1].to_string();
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if hostname.ends_with(".github.io") {
        if let Some(first) = segments.first() {
            return format!("/{first}");
        }
    }

    let local = hostname == "localhost" || hostname == "127.0.0.1";
    if local && segments.len() == 1 && !segments[0].contains('.') {
        return format!("/{}", segments[0]);
    }

    String::new()
}

/// Navigation targets with the base path applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResolver {
    base_path: String,
}

impl PathResolver {
    pub fn new(base_path: impl Into<String>) -> Self { Self { base_path: base_path.into() } }

    pub fn from_config(nav: &NavigationConfig) -> Self {
        match &nav.base_path {
            Some(explicit) => Self::new(explicit.clone()),
            None => Self::new(app_base_path(&nav.hostname, &nav.pathname)),
        }
    }

    pub fn base_path(&self) -> &str { &self.base_path }

    fn with_base(&self, route: &str) -> String {
        format!("{}{}", self.base_path, route)
    }

    pub fn home_path(&self) -> String { self.with_base(HOME_ROUTE) }

    /// Dashboard for a role string; unknown or absent roles land on home.
    pub fn dashboard_path(&self, role: Option<&str>) -> String {
        match normalize_role(role).as_ref().and_then(RoleName::known) {
            Some(r) => self.with_base(dashboard_route(r)),
            None => self.home_path(),
        }
    }

    /// Login page for a role string; unknown or absent roles land on home.
    pub fn login_path(&self, role: Option<&str>) -> String {
        match normalize_role(role).as_ref().and_then(RoleName::known) {
            Some(r) => self.with_base(login_route(r)),
            None => self.home_path(),
        }
    }
}
