//! Move-route steps (codes 0–45), shown as the `509` rows under a
//! `Set Move Route`, plus the quick-insert placeholder rows.

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::formatter::{audio, truncate};
use super::params::{ParamError, Params, pick};
use crate::model::codes::MOVE_STEP;
use crate::model::{Command, MoveCommand};

/// Shown for a 509 row whose step cannot be read at all.
pub const FALLBACK_NAME: &str = "Movement Command";

type StepRule = fn(Params<'_>) -> Result<String, ParamError>;

/// Indexed by step code.
static STEPS: [(&str, Option<StepRule>); 46] = [
    ("", None),
    ("Move Down", None),
    ("Move Left", None),
    ("Move Right", None),
    ("Move Up", None),
    ("Move Lower Left", None),
    ("Move Lower Right", None),
    ("Move Upper Left", None),
    ("Move Upper Right", None),
    ("Move at Random", None),
    ("Move toward Player", None),
    ("Move away from Player", None),
    ("1 Step Forward", None),
    ("1 Step Backward", None),
    ("Jump", Some(jump)),
    ("Wait", Some(wait)),
    ("Turn Down", None),
    ("Turn Left", None),
    ("Turn Right", None),
    ("Turn Up", None),
    ("Turn 90° Right", None),
    ("Turn 90° Left", None),
    ("Turn 180°", None),
    ("Turn 90° Right or Left", None),
    ("Turn at Random", None),
    ("Turn toward Player", None),
    ("Turn away from Player", None),
    ("Switch ON", Some(switch_on)),
    ("Switch OFF", Some(switch_off)),
    ("Change Speed", Some(speed)),
    ("Change Freq", Some(frequency)),
    ("Move Animation ON", None),
    ("Move Animation OFF", None),
    ("Stop Animation ON", None),
    ("Stop Animation OFF", None),
    ("Direction Fix ON", None),
    ("Direction Fix OFF", None),
    ("Through ON", None),
    ("Through OFF", None),
    ("Always on Top ON", None),
    ("Always on Top OFF", None),
    ("Change Graphic", Some(graphic)),
    ("Change Opacity", Some(opacity)),
    ("Change Blending", Some(blending)),
    ("Play SE", Some(play_se)),
    ("Script", Some(script)),
];

/// Name of a step code, `None` outside 0–45.
pub fn step_name(code: i64) -> Option<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|i| STEPS.get(i))
        .map(|(name, _)| *name)
}

/// Format the `{code, parameters}` object nested in a 509 row.
///
/// `Err` when the object is not a step or its code is outside 0–45; a
/// known step with bad parameters falls back to the step's own name.
pub(crate) fn format_step_value(obj: &Value) -> Result<String, ParamError> {
    let step = MoveCommand::deserialize(obj).map_err(|e| ParamError::MalformedStep(e.to_string()))?;
    format_step(&step)
}

fn format_step(step: &MoveCommand) -> Result<String, ParamError> {
    let code = step.code;
    let p = Params::new(&step.parameters);
    let &(name, rule) = usize::try_from(code)
        .ok()
        .and_then(|i| STEPS.get(i))
        .ok_or(ParamError::OutOfRange {
            what: "move step code",
            value: code,
        })?;

    let Some(rule) = rule else {
        return Ok(name.to_string());
    };
    Ok(rule(p).unwrap_or_else(|e| {
        debug!("move step {code} ({name}): {e}");
        name.to_string()
    }))
}

/// Placeholder 509 row for the quick-insert buttons: the step name rides in
/// the indent field and the row has no parameters.
pub fn quick_insert(step_code: i64) -> Option<Command> {
    match step_name(step_code) {
        Some(name) if !name.is_empty() => Some(Command::placeholder(MOVE_STEP, name)),
        _ => None,
    }
}

fn jump(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Jump: {:+},{:+}", p.int(0)?, p.int(1)?))
}

fn wait(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Wait: {} frame(s)", p.int(0)?))
}

fn switch_on(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Switch ON: {:04}", p.int(0)?))
}

fn switch_off(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Switch OFF: {:04}", p.int(0)?))
}

fn speed(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Speed: {}", p.int(0)?))
}

fn frequency(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Freq: {}", p.int(0)?))
}

fn graphic(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Graphic: '{}', {}, {}, {}",
        p.str(0)?,
        p.int(1)?,
        p.int(2)?,
        p.int(3)?
    ))
}

fn opacity(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Opacity: {}", p.int(0)?))
}

fn blending(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Blending: {}",
        pick(&["Normal", "Add", "Sub"], "blend type", p.int(0)?)?
    ))
}

fn play_se(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("SE: {}", audio(p.object(0)?)?))
}

fn script(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Script: {}", truncate(p.str(0)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Indent;
    use serde_json::json;

    /// Same fallback the 509 row uses in the formatter.
    fn step(code: i64, params: Value) -> String {
        format_step_value(&json!({"code": code, "parameters": params}))
            .unwrap_or_else(|_| FALLBACK_NAME.to_string())
    }

    #[test]
    fn plain_steps_use_their_name() {
        assert_eq!(step(1, json!([])), "Move Down");
        assert_eq!(step(22, json!([])), "Turn 180°");
        assert_eq!(step(40, json!([])), "Always on Top OFF");
    }

    #[test]
    fn parameterised_steps() {
        assert_eq!(step(15, json!([4])), "Wait: 4 frame(s)");
        assert_eq!(step(27, json!([3])), "Switch ON: 0003");
        assert_eq!(
            step(41, json!(["001-Fighter01", 0, 2, 0])),
            "Graphic: '001-Fighter01', 0, 2, 0"
        );
        assert_eq!(step(43, json!([1])), "Change Blending: Add");
    }

    #[test]
    fn missing_step_parameters_default_to_empty() {
        assert_eq!(format_step_value(&json!({"code": 3})), Ok("Move Right".to_string()));
    }

    #[test]
    fn malformed_step_falls_back_to_step_name() {
        assert_eq!(step(14, json!(["up"])), "Jump");
        assert_eq!(step(29, json!([])), "Change Speed");
    }

    #[test]
    fn unknown_step_falls_back_to_movement_command() {
        assert_eq!(step(46, json!([])), FALLBACK_NAME);
        assert_eq!(step(-1, json!([])), FALLBACK_NAME);
        assert!(matches!(
            format_step_value(&json!({"parameters": []})),
            Err(ParamError::MalformedStep(_))
        ));
        assert!(format_step_value(&json!({"code": "up"})).is_err());
    }

    #[test]
    fn table_covers_every_step_code() {
        assert_eq!(STEPS.len(), 46);
        assert_eq!(step_name(45), Some("Script"));
        assert_eq!(step_name(46), None);
    }

    #[test]
    fn quick_insert_builds_placeholder_row() {
        let row = quick_insert(14).unwrap();
        assert_eq!(row.code, MOVE_STEP);
        assert_eq!(row.indent, Indent::Placeholder("Jump".into()));
        assert!(row.parameters.is_empty());

        assert!(quick_insert(0).is_none());
        assert!(quick_insert(99).is_none());
    }
}
