use dialweave::journey::{
    action_type_params, action_type_params_for_tag, default_action_config_values,
    default_delay_config_values, delay_type_params, delay_type_params_for_tag, DelayConfig,
    DelayType, JourneyAction, JourneyActionType, JourneyStep,
};
use dialweave::schema::{ParamDefinition, ParamType};
use dialweave::error::SchemaError;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

fn assert_defaults_follow_params(params: &[ParamDefinition], defaults: &Map<String, Value>, tag: &str) {
    let ids: HashSet<&str> = params.iter().map(|p| p.id.as_str()).collect();
    for key in defaults.keys() {
        assert!(ids.contains(key.as_str()), "{tag}: default key '{key}' has no param");
    }

    for param in params {
        match (&param.default, param.required) {
            (Some(declared), _) => {
                assert_eq!(defaults.get(&param.id), Some(declared), "{tag}.{}", param.id)
            }
            (None, true) => {
                let expected = match param.param_type {
                    ParamType::Number => json!(0),
                    ParamType::Boolean => json!(false),
                    ParamType::Select => json!(param
                        .options
                        .as_ref()
                        .and_then(|o| o.first())
                        .cloned()
                        .unwrap_or_default()),
                    ParamType::IvrOptions => json!([]),
                    _ => json!(""),
                };
                assert_eq!(defaults.get(&param.id), Some(&expected), "{tag}.{}", param.id);
            }
            (None, false) => assert!(!defaults.contains_key(&param.id), "{tag}.{}", param.id),
        }
    }
}

#[test]
fn every_action_default_follows_its_params() {
    for action_type in JourneyActionType::ALL {
        let params = action_type_params(action_type);
        let defaults = default_action_config_values(action_type);
        assert_defaults_follow_params(&params, &defaults, action_type.as_str());
        assert_eq!(defaults, default_action_config_values(action_type));
    }
}

#[test]
fn every_delay_default_follows_its_params() {
    for delay_type in DelayType::ALL {
        let params = delay_type_params(delay_type);
        let defaults = default_delay_config_values(delay_type);
        assert_defaults_follow_params(&params, &defaults, delay_type.as_str());
        assert_eq!(defaults, default_delay_config_values(delay_type));
    }
}

#[test]
fn param_ids_are_unique_and_select_defaults_are_options() {
    for action_type in JourneyActionType::ALL {
        let params = action_type_params(action_type);
        let ids: HashSet<&str> = params.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), params.len(), "{action_type}");
        for param in &params {
            assert!(param.check().is_ok(), "{action_type}.{}", param.id);
        }
    }
}

#[test]
fn tags_round_trip_through_strings() {
    for action_type in JourneyActionType::ALL {
        assert_eq!(action_type.as_str().parse::<JourneyActionType>(), Ok(action_type));
        assert_eq!(
            action_type_params_for_tag(action_type.as_str()).unwrap(),
            action_type_params(action_type)
        );
    }
    for delay_type in DelayType::ALL {
        assert_eq!(delay_type.to_string().parse::<DelayType>(), Ok(delay_type));
        assert!(delay_type_params_for_tag(delay_type.as_str()).is_ok());
    }
}

#[test]
fn unknown_tags_are_errors() {
    assert_eq!(
        action_type_params_for_tag("fax"),
        Err(SchemaError::UnknownActionType("fax".into()))
    );
    assert_eq!(
        delay_type_params_for_tag("next_tuesday"),
        Err(SchemaError::UnknownDelayType("next_tuesday".into()))
    );
}

#[test]
fn immediate_delay_has_no_params() {
    assert!(delay_type_params(DelayType::Immediate).is_empty());
    assert!(default_delay_config_values(DelayType::Immediate).is_empty());
    assert!(DelayConfig::default().issues().is_empty());
}

#[test]
fn webhook_method_options() {
    let params = action_type_params(JourneyActionType::Webhook);
    let method = params.iter().find(|p| p.id == "method").unwrap();

    assert_eq!(method.param_type, ParamType::Select);
    assert_eq!(
        method.options.as_deref().unwrap(),
        ["GET", "POST", "PUT", "PATCH", "DELETE"]
    );
    assert_eq!(method.default, Some(json!("POST")));
}

#[test]
fn tag_update_defaults() {
    assert_eq!(
        Value::Object(default_action_config_values(JourneyActionType::TagUpdate)),
        json!({
            "operation": "add",
            "tags": "",
            "recordNote": true,
            "noteText": "Tags updated by journey"
        })
    );
}

#[test]
fn retyped_action_drops_previous_config() {
    let mut action = JourneyAction::new(JourneyActionType::Email);
    action.config.insert("subject".into(), json!("Welcome aboard"));

    action.retype(JourneyActionType::Sms);

    assert_eq!(action.action_type, JourneyActionType::Sms);
    assert!(!action.config.contains_key("subject"));
    assert_eq!(action.config, default_action_config_values(JourneyActionType::Sms));
}

#[test]
fn step_json_uses_wire_tags() {
    let step = JourneyStep::new(1, JourneyActionType::StatusChange);
    let value = serde_json::to_value(&step).unwrap();

    assert_eq!(value["action"]["type"], json!("status_change"));
    assert_eq!(value["delay"]["type"], json!("immediate"));

    let back: JourneyStep = serde_json::from_value(value).unwrap();
    assert_eq!(back, step);
}
