use std::fs;

use rmxp_script_view::Indent;
use rmxp_script_view::parser::load_from_json;

#[test]
fn parses_map_events() {
    let json = fs::read_to_string("tests/map_events.json").unwrap();
    let map = load_from_json(&json).expect("valid json");

    // sample file has two events, sorted by id
    assert_eq!(map.events.len(), 2);

    let guard = &map.events[0];
    assert_eq!(guard.name, "Guard");
    assert_eq!((guard.x, guard.y), (7, 4));
    assert_eq!(guard.pages.len(), 2);
    assert_eq!(guard.pages[0].list.len(), 10);
    assert_eq!(guard.pages[1].list.get(1).unwrap().indent, Indent::Level(1));

    let chest = &map.events[1];
    assert_eq!(chest.id, 3);
    assert_eq!(chest.pages[0].list.get(0).unwrap().code, 126);
}
