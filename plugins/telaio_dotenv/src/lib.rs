//! Environment-file plugin.
//!
//! Extends the workflow lifecycle: scaffolds a starter `.env` after project
//! creation and keeps the dev loop watching the project's env files.

use telaio_sdk::DriverCreator;
use telaio_sdk::workflow::WorkflowContext;

const STARTER_ENV: &str = "# Environment variables for this project.\n# Loaded at dev-loop start; values here never leave your machine.\n";

/// The package's creation capability, discovered by the Telaio kernel.
pub fn create() -> DriverCreator {
    telaio_sdk::create(|lens| {
        let debug = lens.debug();
        let log = lens.log();
        lens.workflow(move |hooks, _ctx| {
            let settings = &mut hooks.dev.add_to_settings;
            settings.watch_file_patterns.push("./.env".to_string());
            settings.watch_file_patterns.push("./.env.*".to_string());
            settings
                .ignore_file_patterns
                .push("./.env.example".to_string());

            let log = log.clone();
            hooks.create.on_after_base_setup =
                Some(Box::new(move |ctx: &WorkflowContext<'_>| {
                    let env_path = ctx.layout.project_root().join(".env");
                    if !env_path.exists() {
                        std::fs::write(&env_path, STARTER_ENV)?;
                        log.info("created starter .env");
                    }
                    Ok(())
                }));

            let debug = debug.clone();
            hooks.dev.on_start = Some(Box::new(move |ctx: &WorkflowContext<'_>| {
                debug.log(&format!(
                    "watching environment files under {}",
                    ctx.layout.project_root().display()
                ));
                Ok(())
            }));

            Ok(())
        });
        Ok(())
    })
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use telaio_sdk::host::HostUtilities;
    use telaio_sdk::workflow::Layout;

    use super::*;

    #[test]
    fn extends_only_the_workflow_lifecycle() {
        let driver = create()
            .instantiate("dotenv", Arc::new(HostUtilities::default()))
            .unwrap();
        assert!(driver.extends_workflow());
        assert!(!driver.extends_runtime());
    }

    #[test]
    fn contributes_env_watch_patterns() {
        let driver = create()
            .instantiate("dotenv", Arc::new(HostUtilities::default()))
            .unwrap();
        let layout = Layout::new("/proj", "/proj/src", "/proj/target");
        let hooks = driver.load_workflow_hooks(&layout).unwrap();

        assert!(
            hooks
                .dev
                .add_to_settings
                .watch_file_patterns
                .contains(&"./.env".to_string())
        );
        assert!(
            hooks
                .dev
                .add_to_settings
                .ignore_file_patterns
                .contains(&"./.env.example".to_string())
        );
        assert!(hooks.create.on_after_base_setup.is_some());
        assert!(hooks.dev.on_start.is_some());
    }
}
