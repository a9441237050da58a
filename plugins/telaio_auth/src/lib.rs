//! Authentication plugin.
//!
//! Extends the runtime lifecycle: adds a bearer-token slice to the
//! per-request context (with the field descriptors type generation needs)
//! and contributes the auth directive extension to the schema library.

use std::sync::Arc;

use serde_json::json;
use telaio_sdk::DriverCreator;
use telaio_sdk::runtime::{
    ContextContribution, ContextField, RuntimeContributions, SchemaContribution, SchemaExtension,
};

/// The package's creation capability, discovered by the Telaio kernel.
pub fn create() -> DriverCreator {
    telaio_sdk::create(|lens| {
        lens.runtime(|| {
            Ok(RuntimeContributions {
                context: Some(ContextContribution {
                    fields: vec![ContextField::new("token", "Option<String>")],
                    create: Arc::new(|request: &serde_json::Value| {
                        let token = request
                            .get("headers")
                            .and_then(|headers| headers.get("authorization"))
                            .and_then(|value| value.as_str())
                            .and_then(|value| value.strip_prefix("Bearer "));
                        Ok(json!({ "token": token }))
                    }),
                }),
                schema: Some(SchemaContribution {
                    extensions: vec![
                        SchemaExtension::new("auth-directives")
                            .with_config(json!({ "directive": "auth" })),
                    ],
                }),
            })
        });
        Ok(())
    })
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use telaio_sdk::host::HostUtilities;

    use super::*;

    #[test]
    fn extends_only_the_runtime_lifecycle() {
        let driver = create()
            .instantiate("auth", Arc::new(HostUtilities::default()))
            .unwrap();
        assert!(!driver.extends_workflow());
        assert!(driver.extends_runtime());
    }

    #[test]
    fn context_creator_extracts_bearer_tokens() {
        let driver = create()
            .instantiate("auth", Arc::new(HostUtilities::default()))
            .unwrap();
        let contributions = driver.load_runtime_contributions().unwrap().unwrap();
        let context = contributions.context.unwrap();

        assert_eq!(context.fields, vec![ContextField::new(
            "token",
            "Option<String>"
        )]);

        let with_token = (context.create)(&json!({
            "headers": { "authorization": "Bearer abc123" }
        }))
        .unwrap();
        assert_eq!(with_token, json!({ "token": "abc123" }));

        let without_token = (context.create)(&json!({ "headers": {} })).unwrap();
        assert_eq!(without_token, json!({ "token": null }));
    }

    #[test]
    fn contributes_the_auth_schema_extension() {
        let driver = create()
            .instantiate("auth", Arc::new(HostUtilities::default()))
            .unwrap();
        let contributions = driver.load_runtime_contributions().unwrap().unwrap();
        let schema = contributions.schema.unwrap();

        assert_eq!(schema.extensions.len(), 1);
        assert_eq!(schema.extensions[0].name, "auth-directives");
    }
}
