//! scope::render
//!
//! Orders the final project set and emits a listing or checkout
//! configuration.
//!
//! # Output
//!
//! Listing mode prints one path per line. Checkout mode prints myrepos-style
//! stanzas:
//!
//! ```text
//! [.]
//! checkout = git clone 'git@gitlab.com:infra/root.git'
//!
//! [app]
//! checkout = git clone 'git@gitlab.com:infra/app.git'
//! ```
//!
//! The designated root, when present, always comes first; in checkout mode it
//! is keyed by the synthetic `.` so the enclosing directory itself becomes
//! the checkout target. Everything else sorts ascending by case-insensitive
//! namespace-qualified path, with the sort kept stable so equal keys preserve
//! input order and repeated renders of the same scope are identical.

use crate::gitlab::ProjectRecord;

/// What to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One path per line.
    Listing,
    /// Checkout configuration stanzas.
    CheckoutConfig,
}

/// Rendering parameters.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output shape.
    pub mode: RenderMode,
    /// Bare path of the project to promote as the root, if any.
    pub root_path: Option<String>,
    /// Show namespace-qualified paths in listings; bare paths otherwise.
    pub show_namespace: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            mode: RenderMode::Listing,
            root_path: None,
            show_namespace: true,
        }
    }
}

/// Render the scope as output lines.
///
/// Pure: the same projects and options produce the same lines every time.
pub fn render(projects: &[ProjectRecord], opts: &RenderOptions) -> Vec<String> {
    let (root, mut rest): (Option<&ProjectRecord>, Vec<&ProjectRecord>) = match &opts.root_path {
        Some(root_path) if !root_path.is_empty() => {
            let root = projects.iter().find(|p| &p.path == root_path);
            let rest = projects
                .iter()
                .filter(|p| root.map_or(true, |r| r.id != p.id))
                .collect();
            (root, rest)
        }
        _ => (None, projects.iter().collect()),
    };

    rest.sort_by(|a, b| {
        a.path_with_namespace
            .to_lowercase()
            .cmp(&b.path_with_namespace.to_lowercase())
    });

    let ordered = root.into_iter().chain(rest);
    match opts.mode {
        RenderMode::Listing => ordered
            .map(|p| {
                if opts.show_namespace {
                    p.path_with_namespace.clone()
                } else {
                    p.path.clone()
                }
            })
            .collect(),
        RenderMode::CheckoutConfig => {
            let mut lines = Vec::new();
            let is_root = |p: &ProjectRecord| root.map_or(false, |r| r.id == p.id);
            for project in ordered {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                let key = if is_root(project) {
                    "."
                } else {
                    project.path.as_str()
                };
                lines.push(format!("[{}]", key));
                lines.push(format!("checkout = git clone '{}'", project.ssh_url));
            }
            lines
        }
    }
}
