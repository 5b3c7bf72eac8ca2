//! Configuration validation
//!
//! Rules:
//! - deployment label non-empty
//! - channel names non-empty, provider-legal charset (alnum, `-`, `_`)
//! - incoming and dead-letter names distinct
//! - batch_size within 1..=10 (provider receive maximum)
//! - archival subscriber non-empty

use contracts::{ContractError, DeploymentBlueprint};

/// Validate a DeploymentBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &DeploymentBlueprint) -> Result<(), ContractError> {
    validate_deployment(blueprint)?;
    validate_channels(blueprint)?;
    validate_batch_size(blueprint)?;
    validate_archival(blueprint)?;
    Ok(())
}

fn validate_deployment(blueprint: &DeploymentBlueprint) -> Result<(), ContractError> {
    if blueprint.deployment.label.trim().is_empty() {
        return Err(ContractError::config_validation(
            "deployment.label",
            "label must not be empty",
        ));
    }
    Ok(())
}

fn validate_channels(blueprint: &DeploymentBlueprint) -> Result<(), ContractError> {
    for (field, name) in [
        ("channels.incoming", &blueprint.channels.incoming),
        ("channels.dead_letter", &blueprint.channels.dead_letter),
    ] {
        if name.is_empty() {
            return Err(ContractError::config_validation(
                field,
                "channel name must not be empty",
            ));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(ContractError::config_validation(
                field,
                format!("illegal character {bad:?} in channel name '{name}'"),
            ));
        }
    }

    if blueprint.channels.incoming == blueprint.channels.dead_letter {
        return Err(ContractError::config_validation(
            "channels.dead_letter",
            "dead-letter channel must differ from the incoming channel",
        ));
    }
    Ok(())
}

fn validate_batch_size(blueprint: &DeploymentBlueprint) -> Result<(), ContractError> {
    let batch_size = blueprint.channels.batch_size;
    if !(1..=10).contains(&batch_size) {
        return Err(ContractError::config_validation(
            "channels.batch_size",
            format!("batch_size must be within 1..=10, got {batch_size}"),
        ));
    }
    Ok(())
}

fn validate_archival(blueprint: &DeploymentBlueprint) -> Result<(), ContractError> {
    if blueprint.archival.subscriber.as_str().trim().is_empty() {
        return Err(ContractError::config_validation(
            "archival.subscriber",
            "archival subscriber id must not be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_toml, ConfigFormat};
    use crate::ConfigLoader;

    fn blueprint_with(channels: &str) -> DeploymentBlueprint {
        let content = format!(
            r#"
[deployment]
label = "highlands"

[channels]
{channels}
"#
        );
        parse_toml(&content).unwrap()
    }

    #[test]
    fn test_valid_blueprint_passes() {
        let bp = blueprint_with("incoming = \"field-data\"\ndead_letter = \"field-data-dlq\"");
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_illegal_channel_character_rejected() {
        let bp = blueprint_with("incoming = \"field data\"\ndead_letter = \"field-data-dlq\"");
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("illegal character"));
    }

    #[test]
    fn test_same_channel_pair_rejected() {
        let bp = blueprint_with("incoming = \"field-data\"\ndead_letter = \"field-data\"");
        let err = validate(&bp).unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let bp = blueprint_with(
            "incoming = \"field-data\"\ndead_letter = \"field-data-dlq\"\nbatch_size = 0",
        );
        assert!(validate(&bp).is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        let content = r#"
[deployment]
label = ""

[channels]
incoming = "field-data"
dead_letter = "field-data-dlq"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
    }
}
