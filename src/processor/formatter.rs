//! Command code → display string.
//!
//! Every row of an event page goes through [`format`]. The table below maps
//! each known code to its editor name and an optional rule that reads the
//! command's positional parameters. A rule that hits a missing or
//! wrong-typed parameter returns `Err`, and the row falls back to the bare
//! name; unknown codes print as `Code N` plus their raw parameters.

use log::debug;
use serde_json::Value;

use super::move_route;
use super::params::{ParamError, Params, field_bool, field_int, field_str, pick};
use crate::model::Command;
use crate::model::codes::MOVE_STEP;

type Rule = fn(Params<'_>) -> Result<String, ParamError>;

struct Entry {
    code: i64,
    name: &'static str,
    rule: Option<Rule>,
}

const fn bare(code: i64, name: &'static str) -> Entry {
    Entry {
        code,
        name,
        rule: None,
    }
}

const fn rule(code: i64, name: &'static str, rule: Rule) -> Entry {
    Entry {
        code,
        name,
        rule: Some(rule),
    }
}

/// Sorted by code; looked up with a binary search.
static TABLE: &[Entry] = &[
    bare(0, ""),
    rule(101, "Show Text", show_text),
    rule(102, "Show Choices", show_choices),
    rule(103, "Input Number", input_number),
    rule(104, "Change Text Options", text_options),
    rule(105, "Button Input Processing", button_input),
    rule(106, "Wait", wait),
    rule(107, "Change Switches", switches),
    rule(108, "Comment", comment),
    rule(111, "Conditional Branch", conditional_branch),
    bare(112, "Loop"),
    bare(113, "Break Loop"),
    bare(115, "Exit Event Processing"),
    bare(116, "Erase Event"),
    rule(117, "Call Common Event", call_common_event),
    rule(118, "Label", label),
    rule(119, "Jump to Label", jump_to_label),
    rule(121, "Control Switches", control_switches),
    rule(122, "Control Variables", control_variables),
    rule(123, "Control Self Switch", self_switch),
    rule(124, "Control Timer", timer),
    rule(125, "Change Gold", change_gold),
    rule(126, "Change Items", change_items),
    rule(127, "Change Weapons", change_weapons),
    rule(128, "Change Armor", change_armor),
    rule(129, "Change Party Member", party_member),
    rule(131, "Change Windowskin", windowskin),
    rule(132, "Change Battle BGM", battle_bgm),
    rule(133, "Change Battle End ME", battle_end_me),
    rule(134, "Change Save Access", save_access),
    rule(135, "Change Menu Access", menu_access),
    rule(136, "Change Encounter", encounter),
    rule(201, "Transfer Player", transfer_player),
    rule(202, "Set Event Location", event_location),
    rule(203, "Scroll Map", scroll_map),
    rule(204, "Change Map Settings", map_settings),
    rule(205, "Change Fog Color Tone", fog_tone),
    rule(206, "Change Fog Opacity", fog_opacity),
    rule(207, "Show Animation", show_animation),
    rule(208, "Change Transparent Flag", transparent_flag),
    rule(209, "Set Move Route", set_move_route),
    bare(210, "Wait for Move's Completion"),
    bare(221, "Prepare for Transition"),
    rule(222, "Execute Transition", execute_transition),
    rule(223, "Change Screen Color Tone", screen_tone),
    rule(224, "Screen Flash", screen_flash),
    rule(225, "Screen Shake", screen_shake),
    rule(231, "Show Picture", show_picture),
    rule(232, "Move Picture", move_picture),
    rule(233, "Rotate Picture", rotate_picture),
    rule(234, "Change Picture Color Tone", picture_tone),
    rule(235, "Erase Picture", erase_picture),
    rule(236, "Set Weather Effects", weather),
    rule(241, "Play BGM", play_bgm),
    rule(242, "Fade Out BGM", fade_out_bgm),
    rule(245, "Play BGS", play_bgs),
    rule(246, "Fade Out BGS", fade_out_bgs),
    bare(247, "Memorize BGM/BGS"),
    bare(248, "Restore BGM/BGS"),
    rule(249, "Play ME", play_me),
    rule(250, "Play SE", play_se),
    bare(251, "Stop SE"),
    rule(301, "Battle Processing", battle),
    rule(302, "Shop Processing", shop),
    rule(303, "Name Input Processing", name_input),
    rule(311, "Change HP", change_hp),
    rule(312, "Change SP", change_sp),
    rule(313, "Change State", change_state),
    rule(314, "Recover All", recover_all),
    rule(315, "Change EXP", change_exp),
    rule(316, "Change Level", change_level),
    rule(317, "Change Parameters", change_parameters),
    rule(318, "Change Skills", change_skills),
    rule(319, "Change Equipment", change_equipment),
    rule(320, "Change Actor Name", actor_name),
    rule(321, "Change Actor Class", actor_class),
    rule(322, "Change Actor Graphic", actor_graphic),
    rule(331, "Change Enemy HP", enemy_hp),
    rule(332, "Change Enemy SP", enemy_sp),
    rule(333, "Change Enemy State", enemy_state),
    rule(334, "Enemy Recover All", enemy_recover),
    rule(335, "Enemy Appearance", enemy_appearance),
    rule(336, "Enemy Transform", enemy_transform),
    rule(337, "Show Battle Animation", battle_animation),
    rule(338, "Deal Damage", deal_damage),
    rule(339, "Force Action", force_action),
    bare(340, "Abort Battle"),
    bare(351, "Call Menu Screen"),
    bare(352, "Call Save Screen"),
    bare(353, "Game Over"),
    bare(354, "Return to Title Screen"),
    rule(355, "Script", script),
    rule(401, "Show Text", continuation),
    rule(402, "When", when_choice),
    bare(403, "When Cancel"),
    bare(404, "Branch End"),
    rule(408, "Comment", comment_continuation),
    bare(411, "Else"),
    bare(412, "Branch End"),
    bare(413, "Repeat Above"),
    rule(509, move_route::FALLBACK_NAME, move_step),
    bare(601, "If Win"),
    bare(602, "If Escape"),
    bare(603, "If Lose"),
    bare(604, "Branch End"),
    rule(605, "Shop Processing", shop_continuation),
    rule(655, "Script", continuation),
];

fn lookup(code: i64) -> Option<&'static Entry> {
    TABLE
        .binary_search_by_key(&code, |e| e.code)
        .ok()
        .map(|i| &TABLE[i])
}

/// Editor name of a command code, if the code is known.
pub fn command_name(code: i64) -> Option<&'static str> {
    lookup(code).map(|e| e.name)
}

/// Render one command as the text shown after its bullet.
pub fn format(cmd: &Command) -> String {
    // Quick-insert rows carry their display label in the indent field.
    if cmd.code == MOVE_STEP && cmd.parameters.is_empty() {
        if let Some(label) = cmd.indent.label() {
            return label.to_string();
        }
    }

    let Some(entry) = lookup(cmd.code) else {
        return unknown(cmd);
    };
    let Some(rule) = entry.rule else {
        return entry.name.to_string();
    };

    match rule(Params::new(&cmd.parameters)) {
        Ok(text) => text,
        Err(e) => {
            debug!("code {} ({}): {}", cmd.code, entry.name, e);
            entry.name.to_string()
        }
    }
}

fn unknown(cmd: &Command) -> String {
    if cmd.parameters.is_empty() {
        return format!("Code {}", cmd.code);
    }
    let raw: Vec<String> = cmd.parameters.iter().map(Value::to_string).collect();
    format!("Code {}: [{}]", cmd.code, raw.join(", "))
}

// ─────────────────────────────────────────────────────
// Shared display helpers
// ─────────────────────────────────────────────────────

const MAX_TEXT: usize = 50;
const KEEP_TEXT: usize = 47;

/// Free text longer than 50 chars keeps its first 47 plus `...`.
pub fn truncate(text: &str) -> String {
    if text.chars().count() > MAX_TEXT {
        let mut out: String = text.chars().take(KEEP_TEXT).collect();
        out.push_str("...");
        out
    } else {
        text.to_string()
    }
}

pub(crate) fn on_off(value: i64) -> &'static str {
    if value == 0 { "ON" } else { "OFF" }
}

fn id_range(start: i64, end: i64) -> String {
    if start == end {
        format!("{start:04}")
    } else {
        format!("{start:04}-{end:04}")
    }
}

fn sign(op: i64) -> &'static str {
    if op == 0 { "+" } else { "-" }
}

/// Constant or variable operand, selected by `p[type_at]`.
fn operand(p: Params<'_>, type_at: usize, value_at: usize) -> Result<String, ParamError> {
    let value = p.int(value_at)?;
    match p.int(type_at)? {
        0 => Ok(value.to_string()),
        1 => Ok(format!("Variable {value:04}")),
        other => Err(ParamError::OutOfRange {
            what: "operand type",
            value: other,
        }),
    }
}

fn actor(id: i64) -> String {
    if id == 0 {
        "Entire Party".to_string()
    } else {
        format!("{id:03}")
    }
}

fn enemy(index: i64) -> String {
    if index < 0 {
        "Entire Troop".to_string()
    } else {
        format!("Enemy {}", index.saturating_add(1))
    }
}

pub(crate) fn character(id: i64) -> String {
    match id {
        -1 => "Player".to_string(),
        0 => "This Event".to_string(),
        n => format!("EV{n:03}"),
    }
}

fn direction(dir: i64) -> Result<&'static str, ParamError> {
    match dir {
        2 => Ok("Down"),
        4 => Ok("Left"),
        6 => Ok("Right"),
        8 => Ok("Up"),
        0 => Ok("Retain"),
        other => Err(ParamError::OutOfRange {
            what: "direction",
            value: other,
        }),
    }
}

/// `'name', volume, pitch` from an audio file object.
pub(crate) fn audio(obj: &Value) -> Result<String, ParamError> {
    let name = field_str(obj, "name")?;
    let volume = field_int(obj, "volume")?;
    let pitch = field_int(obj, "pitch")?;
    Ok(format!("'{name}', {volume}, {pitch}"))
}

fn tone(obj: &Value) -> Result<String, ParamError> {
    Ok(format!(
        "({},{},{},{})",
        field_int(obj, "red")?,
        field_int(obj, "green")?,
        field_int(obj, "blue")?,
        field_int(obj, "gray")?
    ))
}

fn color(obj: &Value) -> Result<String, ParamError> {
    Ok(format!(
        "({},{},{},{})",
        field_int(obj, "red")?,
        field_int(obj, "green")?,
        field_int(obj, "blue")?,
        field_int(obj, "alpha")?
    ))
}

const ENABLE: &[&str] = &["Disable", "Enable"];
const ORIGIN: &[&str] = &["Upper Left", "Center"];
const BLEND: &[&str] = &["Normal", "Add", "Sub"];
const GOODS: &[&str] = &["Item", "Weapon", "Armor"];

// ─────────────────────────────────────────────────────
// Messages and flow
// ─────────────────────────────────────────────────────

fn show_text(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Show Text: \"{}\"", truncate(p.str(0)?)))
}

fn continuation(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(": \"{}\"", truncate(p.str(0)?)))
}

fn show_choices(p: Params<'_>) -> Result<String, ParamError> {
    let choices = p
        .array(0)?
        .iter()
        .enumerate()
        .map(|(i, c)| {
            c.as_str().ok_or(ParamError::WrongType {
                index: i,
                expected: "a choice string",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("Show Choices: {}", truncate(&choices.join(", "))))
}

fn when_choice(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("When [{}]", truncate(p.str(1)?)))
}

fn input_number(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Input Number: {:04}, {} digit(s)",
        p.int(0)?,
        p.int(1)?
    ))
}

fn text_options(p: Params<'_>) -> Result<String, ParamError> {
    let position = pick(&["Top", "Middle", "Bottom"], "text position", p.int(0)?)?;
    let window = pick(&["Show", "Hide"], "window frame", p.int(1)?)?;
    Ok(format!("Change Text Options: {position}, {window}"))
}

fn button_input(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Button Input Processing: {:04}", p.int(0)?))
}

fn wait(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Wait: {} frame(s)", p.int(0)?))
}

fn comment(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Comment: {}", truncate(p.str(0)?)))
}

fn comment_continuation(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(": {}", truncate(p.str(0)?)))
}

fn call_common_event(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Call Common Event: {:03}", p.int(0)?))
}

fn label(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Label: {}", truncate(p.str(0)?)))
}

fn jump_to_label(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Jump to Label: {}", truncate(p.str(0)?)))
}

fn script(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Script: {}", truncate(p.str(0)?)))
}

fn button_name(code: i64) -> Result<&'static str, ParamError> {
    Ok(match code {
        2 => "Down",
        4 => "Left",
        6 => "Right",
        8 => "Up",
        11 => "A",
        12 => "B",
        13 => "C",
        14 => "X",
        15 => "Y",
        16 => "Z",
        17 => "L",
        18 => "R",
        other => {
            return Err(ParamError::OutOfRange {
                what: "button",
                value: other,
            });
        }
    })
}

fn conditional_branch(p: Params<'_>) -> Result<String, ParamError> {
    const COMPARE: &[&str] = &["==", ">=", "<=", ">", "<", "!="];
    const MORE_LESS: &[&str] = &["or more", "or less"];

    let cond = match p.int(0)? {
        0 => format!("Switch {:04} == {}", p.int(1)?, on_off(p.int(2)?)),
        1 => format!(
            "Variable {:04} {} {}",
            p.int(1)?,
            pick(COMPARE, "comparison", p.int(4)?)?,
            operand(p, 2, 3)?
        ),
        2 => format!("Self Switch {} == {}", p.str(1)?, on_off(p.int(2)?)),
        3 => {
            let secs = p.int(1)?;
            format!(
                "Timer {} min. {} sec. {}",
                secs / 60,
                secs % 60,
                pick(MORE_LESS, "timer comparison", p.int(2)?)?
            )
        }
        4 => {
            let who = format!("Actor {:03}", p.int(1)?);
            match p.int(2)? {
                0 => format!("{who} is in the party"),
                1 => format!("{who} name is '{}'", p.str(3)?),
                2 => format!("{who} Skill {:03} learned", p.int(3)?),
                3 => format!("{who} Weapon {:03} equipped", p.int(3)?),
                4 => format!("{who} Armor {:03} equipped", p.int(3)?),
                5 => format!("{who} State {:03} inflicted", p.int(3)?),
                other => {
                    return Err(ParamError::OutOfRange {
                        what: "actor condition",
                        value: other,
                    });
                }
            }
        }
        5 => {
            let who = enemy(p.int(1)?);
            match p.int(2)? {
                0 => format!("{who} appeared"),
                1 => format!("{who} State {:03} inflicted", p.int(3)?),
                other => {
                    return Err(ParamError::OutOfRange {
                        what: "enemy condition",
                        value: other,
                    });
                }
            }
        }
        6 => format!("{} facing {}", character(p.int(1)?), direction(p.int(2)?)?),
        7 => format!(
            "Gold {} {}",
            p.int(1)?,
            pick(MORE_LESS, "gold comparison", p.int(2)?)?
        ),
        8 => format!("Item {:03} in Inventory", p.int(1)?),
        9 => format!("Weapon {:03} in Inventory", p.int(1)?),
        10 => format!("Armor {:03} in Inventory", p.int(1)?),
        11 => format!("Button {} is being pressed", button_name(p.int(1)?)?),
        12 => format!("Script: {}", truncate(p.str(1)?)),
        other => {
            return Err(ParamError::OutOfRange {
                what: "condition type",
                value: other,
            });
        }
    };
    Ok(format!("Conditional Branch: {cond}"))
}

// ─────────────────────────────────────────────────────
// Game progression
// ─────────────────────────────────────────────────────

fn switch_rule(name: &str, p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "{name}: {} = {}",
        id_range(p.int(0)?, p.int(1)?),
        on_off(p.int(2)?)
    ))
}

fn switches(p: Params<'_>) -> Result<String, ParamError> {
    switch_rule("Change Switches", p)
}

fn control_switches(p: Params<'_>) -> Result<String, ParamError> {
    switch_rule("Control Switches", p)
}

fn control_variables(p: Params<'_>) -> Result<String, ParamError> {
    const OPS: &[&str] = &["=", "+=", "-=", "*=", "/=", "%="];
    const ACTOR_STATS: &[&str] = &[
        "Level", "EXP", "HP", "SP", "MaxHP", "MaxSP", "STR", "DEX", "AGI", "INT", "ATK", "PDEF",
        "MDEF", "EVA",
    ];
    const ENEMY_STATS: &[&str] = &[
        "HP", "SP", "MaxHP", "MaxSP", "STR", "DEX", "AGI", "INT", "ATK", "PDEF", "MDEF", "EVA",
    ];
    const CHAR_STATS: &[&str] = &[
        "Map X",
        "Map Y",
        "Direction",
        "Screen X",
        "Screen Y",
        "Terrain Tag",
    ];
    const OTHER: &[&str] = &[
        "Map ID",
        "Party Members",
        "Gold",
        "Steps",
        "Play Time",
        "Timer",
        "Save Count",
    ];

    let target = id_range(p.int(0)?, p.int(1)?);
    let op = pick(OPS, "variable operation", p.int(2)?)?;
    let a = p.int(4)?;
    let value = match p.int(3)? {
        0 => a.to_string(),
        1 => format!("Variable {a:04}"),
        2 => format!("Random No. ({}...{})", a, p.int(5)?),
        3 => format!("Item {a:03} In Inventory"),
        4 => format!(
            "Actor {a:03} {}",
            pick(ACTOR_STATS, "actor stat", p.int(5)?)?
        ),
        5 => format!(
            "{} {}",
            enemy(a),
            pick(ENEMY_STATS, "enemy stat", p.int(5)?)?
        ),
        6 => format!(
            "{} {}",
            character(a),
            pick(CHAR_STATS, "character stat", p.int(5)?)?
        ),
        7 => pick(OTHER, "other operand", a)?.to_string(),
        other => {
            return Err(ParamError::OutOfRange {
                what: "operand type",
                value: other,
            });
        }
    };
    Ok(format!("Control Variables: {target} {op} {value}"))
}

fn self_switch(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Control Self Switch: {} = {}",
        p.str(0)?,
        on_off(p.int(1)?)
    ))
}

fn timer(p: Params<'_>) -> Result<String, ParamError> {
    match p.int(0)? {
        0 => {
            let secs = p.int(1)?;
            Ok(format!(
                "Control Timer: Startup ({} min. {} sec.)",
                secs / 60,
                secs % 60
            ))
        }
        _ => Ok("Control Timer: Stop".to_string()),
    }
}

fn change_gold(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Gold: {} {}",
        sign(p.int(0)?),
        operand(p, 1, 2)?
    ))
}

fn goods_rule(name: &str, p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "{name}: {:03} {} {}",
        p.int(0)?,
        sign(p.int(1)?),
        operand(p, 2, 3)?
    ))
}

fn change_items(p: Params<'_>) -> Result<String, ParamError> {
    goods_rule("Change Items", p)
}

fn change_weapons(p: Params<'_>) -> Result<String, ParamError> {
    goods_rule("Change Weapons", p)
}

fn change_armor(p: Params<'_>) -> Result<String, ParamError> {
    goods_rule("Change Armor", p)
}

fn party_member(p: Params<'_>) -> Result<String, ParamError> {
    let op = pick(&["Add", "Remove"], "party operation", p.int(1)?)?;
    let init = if p.opt_int(2)?.unwrap_or(0) != 0 {
        ", Initialize"
    } else {
        ""
    };
    Ok(format!("Change Party Member: {op} {:03}{init}", p.int(0)?))
}

fn windowskin(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Windowskin: '{}'", p.str(0)?))
}

fn battle_bgm(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Battle BGM: {}", audio(p.object(0)?)?))
}

fn battle_end_me(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Battle End ME: {}", audio(p.object(0)?)?))
}

fn save_access(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Save Access: {}",
        pick(ENABLE, "access flag", p.int(0)?)?
    ))
}

fn menu_access(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Menu Access: {}",
        pick(ENABLE, "access flag", p.int(0)?)?
    ))
}

fn encounter(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Encounter: {}",
        pick(ENABLE, "encounter flag", p.int(0)?)?
    ))
}

// ─────────────────────────────────────────────────────
// Map, characters and screen
// ─────────────────────────────────────────────────────

fn transfer_player(p: Params<'_>) -> Result<String, ParamError> {
    let (map, x, y) = (p.int(1)?, p.int(2)?, p.int(3)?);
    match p.int(0)? {
        0 => Ok(format!("Transfer Player: {map:03} ({x:03},{y:03})")),
        _ => Ok(format!(
            "Transfer Player: Variable [{map:04}][{x:04}][{y:04}]"
        )),
    }
}

fn event_location(p: Params<'_>) -> Result<String, ParamError> {
    let who = character(p.int(0)?);
    let (x, y) = (p.int(2)?, p.int(3)?);
    let place = match p.int(1)? {
        0 => format!("({x:03},{y:03})"),
        1 => format!("Variable [{x:04}][{y:04}]"),
        _ => format!("Switch with {}", character(x)),
    };
    Ok(format!("Set Event Location: {who}, {place}"))
}

fn scroll_map(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Scroll Map: {}, {}, {}",
        direction(p.int(0)?)?,
        p.int(1)?,
        p.int(2)?
    ))
}

fn map_settings(p: Params<'_>) -> Result<String, ParamError> {
    let kind = pick(&["Panorama", "Fog", "Battleback"], "map setting", p.int(0)?)?;
    let name = p.str(1)?;
    match p.opt_int(2)? {
        Some(hue) => Ok(format!("Change Map Settings: {kind} = '{name}', {hue}")),
        None => Ok(format!("Change Map Settings: {kind} = '{name}'")),
    }
}

fn fog_tone(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Fog Color Tone: {}, @{}",
        tone(p.object(0)?)?,
        p.int(1)?
    ))
}

fn fog_opacity(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Change Fog Opacity: {}, @{}", p.int(0)?, p.int(1)?))
}

fn show_animation(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Show Animation: {}, {:03}",
        character(p.int(0)?),
        p.int(1)?
    ))
}

fn transparent_flag(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Transparent Flag: {}",
        pick(&["Transparency", "Normal"], "transparent flag", p.int(0)?)?
    ))
}

fn set_move_route(p: Params<'_>) -> Result<String, ParamError> {
    let who = character(p.int(0)?);
    let mut flags = Vec::new();
    if let Ok(route) = p.object(1) {
        if field_bool(route, "repeat").unwrap_or(false) {
            flags.push("Repeat Action");
        }
        if field_bool(route, "skippable").unwrap_or(false) {
            flags.push("Ignore If Can't Move");
        }
    }
    if flags.is_empty() {
        Ok(format!("Set Move Route: {who}"))
    } else {
        Ok(format!("Set Move Route: {who} ({})", flags.join(", ")))
    }
}

fn move_step(p: Params<'_>) -> Result<String, ParamError> {
    move_route::format_step_value(p.object(0)?)
}

fn execute_transition(p: Params<'_>) -> Result<String, ParamError> {
    let name = p.str(0)?;
    if name.is_empty() {
        Ok("Execute Transition".to_string())
    } else {
        Ok(format!("Execute Transition: '{name}'"))
    }
}

fn screen_tone(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Screen Color Tone: {}, @{}",
        tone(p.object(0)?)?,
        p.int(1)?
    ))
}

fn screen_flash(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Screen Flash: {}, @{}",
        color(p.object(0)?)?,
        p.int(1)?
    ))
}

fn screen_shake(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Screen Shake: {}, {}, @{}",
        p.int(0)?,
        p.int(1)?,
        p.int(2)?
    ))
}

/// Shared tail of show/move picture: origin, position, zoom, opacity, blend.
fn picture_placement(p: Params<'_>, at: usize) -> Result<String, ParamError> {
    let origin = pick(ORIGIN, "picture origin", p.int(at)?)?;
    let (x, y) = (p.int(at + 2)?, p.int(at + 3)?);
    let position = match p.int(at + 1)? {
        0 => format!("({x},{y})"),
        _ => format!("Variable [{x:04}][{y:04}]"),
    };
    Ok(format!(
        "{origin} {position}, ({}%,{}%), {}, {}",
        p.int(at + 4)?,
        p.int(at + 5)?,
        p.int(at + 6)?,
        pick(BLEND, "blend type", p.int(at + 7)?)?
    ))
}

fn show_picture(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Show Picture: {}, '{}', {}",
        p.int(0)?,
        p.str(1)?,
        picture_placement(p, 2)?
    ))
}

fn move_picture(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Move Picture: {}, @{}, {}",
        p.int(0)?,
        p.int(1)?,
        picture_placement(p, 2)?
    ))
}

fn rotate_picture(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Rotate Picture: {}, {:+}", p.int(0)?, p.int(1)?))
}

fn picture_tone(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Picture Color Tone: {}, {}, @{}",
        p.int(0)?,
        tone(p.object(1)?)?,
        p.int(2)?
    ))
}

fn erase_picture(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Erase Picture: {}", p.int(0)?))
}

fn weather(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Set Weather Effects: {}, {}, @{}",
        pick(&["None", "Rain", "Storm", "Snow"], "weather", p.int(0)?)?,
        p.int(1)?,
        p.int(2)?
    ))
}

// ─────────────────────────────────────────────────────
// Audio
// ─────────────────────────────────────────────────────

fn play_bgm(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Play BGM: {}", audio(p.object(0)?)?))
}

fn fade_out_bgm(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Fade Out BGM: {} sec.", p.int(0)?))
}

fn play_bgs(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Play BGS: {}", audio(p.object(0)?)?))
}

fn fade_out_bgs(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Fade Out BGS: {} sec.", p.int(0)?))
}

fn play_me(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Play ME: {}", audio(p.object(0)?)?))
}

fn play_se(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Play SE: {}", audio(p.object(0)?)?))
}

// ─────────────────────────────────────────────────────
// Scene control and actors
// ─────────────────────────────────────────────────────

fn battle(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Battle Processing: {:03}", p.int(0)?))
}

fn goods(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "{} {:03}",
        pick(GOODS, "goods type", p.int(0)?)?,
        p.int(1)?
    ))
}

fn shop(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Shop Processing: {}", goods(p)?))
}

fn shop_continuation(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(": {}", goods(p)?))
}

fn name_input(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Name Input Processing: {:03}, {} characters",
        p.int(0)?,
        p.int(1)?
    ))
}

/// `[actor, op, operand type, operand, ..]` layout shared by HP/SP/EXP/Level.
fn actor_amount(name: &str, p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "{name}: {}, {} {}",
        actor(p.int(0)?),
        sign(p.int(1)?),
        operand(p, 2, 3)?
    ))
}

fn change_hp(p: Params<'_>) -> Result<String, ParamError> {
    actor_amount("Change HP", p)
}

fn change_sp(p: Params<'_>) -> Result<String, ParamError> {
    actor_amount("Change SP", p)
}

fn change_exp(p: Params<'_>) -> Result<String, ParamError> {
    actor_amount("Change EXP", p)
}

fn change_level(p: Params<'_>) -> Result<String, ParamError> {
    actor_amount("Change Level", p)
}

fn change_state(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change State: {}, {} {:03}",
        actor(p.int(0)?),
        sign(p.int(1)?),
        p.int(2)?
    ))
}

fn recover_all(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Recover All: {}", actor(p.int(0)?)))
}

fn change_parameters(p: Params<'_>) -> Result<String, ParamError> {
    const STATS: &[&str] = &["MaxHP", "MaxSP", "STR", "DEX", "AGI", "INT"];
    Ok(format!(
        "Change Parameters: {:03}, {} {} {}",
        p.int(0)?,
        pick(STATS, "parameter", p.int(1)?)?,
        sign(p.int(2)?),
        operand(p, 3, 4)?
    ))
}

fn change_skills(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Skills: {:03}, {} {:03}",
        p.int(0)?,
        sign(p.int(1)?),
        p.int(2)?
    ))
}

fn change_equipment(p: Params<'_>) -> Result<String, ParamError> {
    const SLOTS: &[&str] = &["Weapon", "Shield", "Helmet", "Body Armor", "Accessory"];
    let item = match p.int(2)? {
        0 => "(None)".to_string(),
        id => format!("{id:03}"),
    };
    Ok(format!(
        "Change Equipment: {:03}, {} = {item}",
        p.int(0)?,
        pick(SLOTS, "equipment slot", p.int(1)?)?
    ))
}

fn actor_name(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Actor Name: {:03}, '{}'",
        p.int(0)?,
        p.str(1)?
    ))
}

fn actor_class(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Actor Class: {:03}, {:03}",
        p.int(0)?,
        p.int(1)?
    ))
}

fn actor_graphic(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Actor Graphic: {:03}, '{}', {}, '{}', {}",
        p.int(0)?,
        p.str(1)?,
        p.int(2)?,
        p.str(3)?,
        p.int(4)?
    ))
}

// ─────────────────────────────────────────────────────
// Battle
// ─────────────────────────────────────────────────────

fn enemy_amount(name: &str, p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "{name}: {}, {} {}",
        enemy(p.int(0)?),
        sign(p.int(1)?),
        operand(p, 2, 3)?
    ))
}

fn enemy_hp(p: Params<'_>) -> Result<String, ParamError> {
    enemy_amount("Change Enemy HP", p)
}

fn enemy_sp(p: Params<'_>) -> Result<String, ParamError> {
    enemy_amount("Change Enemy SP", p)
}

fn enemy_state(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Change Enemy State: {}, {} {:03}",
        enemy(p.int(0)?),
        sign(p.int(1)?),
        p.int(2)?
    ))
}

fn enemy_recover(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Enemy Recover All: {}", enemy(p.int(0)?)))
}

fn enemy_appearance(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!("Enemy Appearance: {}", enemy(p.int(0)?)))
}

fn enemy_transform(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Enemy Transform: {}, {:03}",
        enemy(p.int(0)?),
        p.int(1)?
    ))
}

/// `[0 = enemy | 1 = actor, index]` battler reference.
fn battler(p: Params<'_>, at: usize) -> Result<String, ParamError> {
    let index = p.int(at + 1)?;
    match p.int(at)? {
        0 => Ok(enemy(index)),
        _ if index < 0 => Ok("Entire Party".to_string()),
        _ => Ok(format!("Actor No.{}", index.saturating_add(1))),
    }
}

fn battle_animation(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Show Battle Animation: {}, {:03}",
        battler(p, 0)?,
        p.int(2)?
    ))
}

fn deal_damage(p: Params<'_>) -> Result<String, ParamError> {
    Ok(format!(
        "Deal Damage: {}, {}",
        battler(p, 0)?,
        operand(p, 2, 3)?
    ))
}

fn force_action(p: Params<'_>) -> Result<String, ParamError> {
    let action = match p.int(2)? {
        0 => pick(
            &["Attack", "Defend", "Escape", "Do Nothing"],
            "basic action",
            p.int(3)?,
        )?
        .to_string(),
        _ => format!("Skill {:03}", p.int(3)?),
    };
    Ok(format!("Force Action: {}, {action}", battler(p, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cmd(code: i64, params: Value) -> Command {
        let parameters = match params {
            Value::Array(a) => a,
            _ => panic!("test params must be an array"),
        };
        Command::new(code, 0, parameters)
    }

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(TABLE.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn show_text_without_parameters_is_bare_name() {
        assert_eq!(format(&cmd(101, json!([]))), "Show Text");
    }

    #[test]
    fn show_text_truncates_long_text() {
        let text = "abcdefghij".repeat(6);
        let out = format(&cmd(101, json!([text])));
        assert_eq!(out, format!("Show Text: \"{}...\"", &text[..47]));
    }

    #[test]
    fn text_of_exactly_fifty_chars_is_kept() {
        let text = "x".repeat(50);
        assert_eq!(truncate(&text), text);
        assert_eq!(truncate(&"x".repeat(51)).chars().count(), 50);
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(60);
        let out = truncate(&text);
        assert_eq!(out.chars().count(), 50);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn switches_are_zero_padded() {
        assert_eq!(
            format(&cmd(107, json!([5, 5, 0]))),
            "Change Switches: 0005 = ON"
        );
        assert_eq!(
            format(&cmd(107, json!([5, 8, 1]))),
            "Change Switches: 0005-0008 = OFF"
        );
        assert_eq!(
            format(&cmd(121, json!([12, 12, 1]))),
            "Control Switches: 0012 = OFF"
        );
    }

    #[test]
    fn unknown_code_shows_raw_parameters() {
        assert_eq!(format(&cmd(999, json!([]))), "Code 999");
        assert_eq!(
            format(&cmd(999, json!([1, "a"]))),
            "Code 999: [1, \"a\"]"
        );
    }

    #[test]
    fn wrong_types_fall_back_to_name() {
        assert_eq!(format(&cmd(106, json!(["soon"]))), "Wait");
        assert_eq!(format(&cmd(107, json!([5]))), "Change Switches");
        assert_eq!(format(&cmd(111, json!([99]))), "Conditional Branch");
        assert_eq!(format(&cmd(241, json!(["town"]))), "Play BGM");
        assert_eq!(format(&cmd(509, json!([]))), "Movement Command");
    }

    #[test]
    fn variables_and_items() {
        assert_eq!(
            format(&cmd(122, json!([3, 3, 1, 0, 10]))),
            "Control Variables: 0003 += 10"
        );
        assert_eq!(
            format(&cmd(122, json!([1, 2, 0, 2, 1, 6]))),
            "Control Variables: 0001-0002 = Random No. (1...6)"
        );
        assert_eq!(
            format(&cmd(126, json!([4, 0, 0, 2]))),
            "Change Items: 004 + 2"
        );
        assert_eq!(
            format(&cmd(125, json!([1, 1, 7]))),
            "Change Gold: - Variable 0007"
        );
    }

    #[test]
    fn conditional_branches() {
        assert_eq!(
            format(&cmd(111, json!([0, 9, 0]))),
            "Conditional Branch: Switch 0009 == ON"
        );
        assert_eq!(
            format(&cmd(111, json!([1, 2, 0, 5, 1]))),
            "Conditional Branch: Variable 0002 >= 5"
        );
        assert_eq!(
            format(&cmd(111, json!([2, "A", 1]))),
            "Conditional Branch: Self Switch A == OFF"
        );
        assert_eq!(
            format(&cmd(111, json!([11, 13]))),
            "Conditional Branch: Button C is being pressed"
        );
    }

    #[test]
    fn transfer_and_audio() {
        assert_eq!(
            format(&cmd(201, json!([0, 2, 5, 10, 2, 0]))),
            "Transfer Player: 002 (005,010)"
        );
        assert_eq!(
            format(&cmd(
                241,
                json!([{"name": "009-Town01", "volume": 100, "pitch": 100}])
            )),
            "Play BGM: '009-Town01', 100, 100"
        );
    }

    #[test]
    fn choices_and_branches() {
        assert_eq!(
            format(&cmd(102, json!([["Yes", "No"], 2]))),
            "Show Choices: Yes, No"
        );
        assert_eq!(format(&cmd(402, json!([0, "Yes"]))), "When [Yes]");
        assert_eq!(format(&cmd(404, json!([]))), "Branch End");
    }

    #[test]
    fn move_route_header_and_step() {
        let route = json!({"repeat": true, "skippable": false, "list": []});
        assert_eq!(
            format(&cmd(209, json!([-1, route]))),
            "Set Move Route: Player (Repeat Action)"
        );
        assert_eq!(
            format(&cmd(509, json!([{"code": 14, "parameters": [1, -2]}]))),
            "Jump: +1,-2"
        );
    }

    #[test]
    fn quick_insert_placeholder_uses_its_label() {
        assert_eq!(format(&Command::placeholder(509, "Jump")), "Jump");
    }

    #[test]
    fn blank_indent_on_step_row_is_not_a_label() {
        for indent in ["", "   "] {
            let c: Command =
                serde_json::from_value(json!({"code": 509, "indent": indent, "parameters": []}))
                    .unwrap();
            assert_eq!(format(&c), "Movement Command");
        }
    }

    #[test]
    fn placeholder_label_ignored_for_other_codes() {
        assert_eq!(format(&Command::placeholder(101, "Jump")), "Show Text");
    }

    #[test]
    fn format_is_repeatable() {
        let c = cmd(107, json!([1, 2, 0]));
        assert_eq!(format(&c), format(&c));
    }
}
