//! Known shape of the conjoon configuration files and the package manifest.
//!
//! Only the sections the installer writes are typed. Everything below
//! `conjoon.packages` stays a generic JSON tree addressed by [`ConfigPath`].

use serde::Serialize;

use crate::domain::document::ConfigPath;

const GITHUB_TEXT: &str = "Leave a ⭐ at <a target=\"_blank\" href=\"https://github.com/conjoon/conjoon\">Github</a> if you like it!";

/// Simulator packages switched off for custom installations.
pub const SIMULATOR_PACKAGES: [&str; 3] =
    ["extjs-dev-webmailsim", "extjs-dev-imapusersim", "extjs-ctrl-simmanager"];

/// Package serving the email backend.
pub const EMAIL_PACKAGE: &str = "extjs-app-webmail";

/// `conjoon.application`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSection {
    pub title: String,
    pub tagline: String,
    pub title_tpl: String,
    pub announcement: Announcement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ApplicationSection {
    pub fn for_site(site_name: &str) -> Self {
        let message = if site_name.eq_ignore_ascii_case("conjoon") {
            format!("Welcome to {}! {}", site_name, GITHUB_TEXT)
        } else {
            format!("Welcome to {}, powered by conjoon! {}", site_name, GITHUB_TEXT)
        };

        Self {
            title: site_name.to_string(),
            tagline: "webmail made easy".to_string(),
            title_tpl: format!("${{title}} | {}", site_name),
            announcement: Announcement { message, kind: "success".to_string() },
        }
    }

    pub fn path() -> ConfigPath {
        ConfigPath::new(["conjoon", "application"])
    }
}

/// `conjoon.packages.<package>`.
pub fn package_path(package: &str) -> ConfigPath {
    ConfigPath::new(["conjoon", "packages", package])
}

/// Base URL of the auth service provided by `auth_package`.
pub fn auth_service_base(auth_package: &str) -> ConfigPath {
    ConfigPath::new(["conjoon", "packages", auth_package, "config", "service", "rest-imapuser"])
        .child("base")
}

/// Base URL of the email service.
pub fn email_service_base() -> ConfigPath {
    ConfigPath::new(["conjoon", "packages", EMAIL_PACKAGE, "config", "service", "rest-api-email"])
        .child("base")
}

/// Controller registration switch of a package.
pub fn register_controller(package: &str) -> ConfigPath {
    package_path(package).child("autoLoad").child("registerController")
}

/// Top-level fields rewritten in `package.json` after installation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageManifestPatch {
    pub name: String,
    pub author: Person,
    pub repository: Repository,
    pub version: String,
    pub description: String,
    pub private: bool,
    pub contributors: Vec<Contributor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repository {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub url: String,
}

impl PackageManifestPatch {
    pub fn for_site(site_name: &str) -> Self {
        Self {
            name: site_name.to_string(),
            author: Person { name: String::new(), email: String::new() },
            repository: Repository {
                kind: "git".to_string(),
                url: format!("git+https://github.com/{}.git", site_name),
            },
            version: "0.0.1".to_string(),
            description: "conjoon - webmail made easy".to_string(),
            private: true,
            contributors: vec![Contributor {
                name: "Thorsten Suckow-Homberg".to_string(),
                email: "thorsten@suckow-homberg.de".to_string(),
                url: "https://conjoon.org".to_string(),
            }],
        }
    }
}
