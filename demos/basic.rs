use json_schema_to_form::{InputEvent, parse_form};

fn main() {
    // Example 1: Simple object
    let schema1 = r#"{
        "type": "object",
        "properties": {
            "name": { "type": "string", "title": "Name" },
            "age": { "type": "integer", "minimum": 0, "maximum": 120 },
            "email": { "type": "string", "format": "email" }
        },
        "required": ["name", "email"]
    }"#;

    println!("=== Example 1: Simple Object ===");
    let mut form = parse_form(schema1, Some(r#"{"name": "Ada"}"#)).unwrap();
    let age = form.find("age").unwrap().id();
    form.handle_event(age, &InputEvent::input("36")).unwrap();
    println!("{}\n", serde_json::to_string_pretty(&form.value()).unwrap());

    // Example 2: Array
    let schema2 = r#"{
        "type": "array",
        "items": { "type": "string", "title": "Tag" },
        "maxItems": 3
    }"#;

    println!("=== Example 2: Array ===");
    let mut form = parse_form(schema2, Some(r#"["rust", "forms"]"#)).unwrap();
    let root = form.root_id().unwrap();
    let item = form.push_item(root).unwrap();
    form.handle_event(item, &InputEvent::input("schema")).unwrap();
    form.move_item_up(root, 2).unwrap();
    println!("{}\n", serde_json::to_string(&form.value()).unwrap());

    // Example 3: Enum
    let schema3 = r#"{
        "type": "string",
        "enum": ["active", "inactive", "pending"]
    }"#;

    println!("=== Example 3: Enum ===");
    let form = parse_form(schema3, Some(r#""pending""#)).unwrap();
    for option in form.root().unwrap().children() {
        let attrs = form.attrs(*option).unwrap();
        println!(
            "{} checked={}",
            attrs.value.unwrap_or_default(),
            attrs.checked.unwrap_or(false)
        );
    }
    println!();

    // Example 4: Render tree
    println!("=== Example 4: Render Tree ===");
    let form = parse_form(schema1, None).unwrap();
    println!("{}", serde_json::to_string_pretty(&form.view()).unwrap());
}
