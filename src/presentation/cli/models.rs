use std::fmt::Write;

use crate::application::services::ModelManager;
use crate::domain::BackendFamily;

/// Registry listing; the active model of each family is starred.
pub fn render_models(manager: &ModelManager, family: Option<BackendFamily>) -> String {
    let families = match family {
        Some(family) => vec![family],
        None => manager.families(),
    };

    let mut out = String::new();
    for family in families {
        let active = manager.active_key(family).unwrap_or_default();
        let _ = writeln!(out, "{} (active: {})", family, active);

        for (key, descriptor) in manager.list_all(family) {
            let marker = if key == active { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "  {} {:<12} {:<34} {:<10} {}",
                marker,
                key,
                descriptor.display_name,
                descriptor.size,
                descriptor.backend_identifier
            );
        }
    }
    out
}
