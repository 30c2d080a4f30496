//! Serializable render tree handed to a UI layer.

use crate::components::ComponentRef;
use crate::field::{Attrs, Field, FieldId, FieldKind, ListOption, Message, option_string};
use crate::form::Form;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonAction {
    Push,
    MoveUp,
    MoveDown,
    Delete,
}

impl ButtonAction {
    /// Key of the button's label in the array descriptor.
    fn label_key(self) -> &'static str {
        match self {
            ButtonAction::Push => "push",
            ButtonAction::MoveUp => "moveUp",
            ButtonAction::MoveDown => "moveDown",
            ButtonAction::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub kind: FieldKind,
    pub action: ButtonAction,
    pub label: String,
    pub disabled: bool,
    pub component: ComponentRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Keys of the member fields.
    pub children: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub key: String,
    pub kind: FieldKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub component: ComponentRef,
    pub attrs: Attrs,
    /// `data-fs-*` attributes marking the element.
    pub data: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub required: bool,
    pub is_root: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ListOption>,
    /// Push button of an array, or the item buttons of an array item.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldView>,
}

pub(crate) fn build(form: &Form, id: FieldId) -> Option<FieldView> {
    let field = form.field(id)?;
    let attrs = form.attrs(id)?;
    let descriptor = field.descriptor();
    let name = form.name(id);

    let mut data = BTreeMap::new();
    data.insert("data-fs-kind".to_string(), descriptor.kind.clone());
    data.insert("data-fs-field".to_string(), name.clone());
    if field.required() {
        data.insert("data-fs-required".to_string(), "true".to_string());
    }

    let children: Vec<FieldView> = field
        .children()
        .iter()
        .enumerate()
        .filter_map(|(index, child)| {
            let mut view = build(form, *child)?;
            view.buttons.extend(item_buttons(form, field, index));
            Some(view)
        })
        .collect();

    let groups = field
        .groups()
        .iter()
        .map(|group| GroupView {
            id: group.id.clone(),
            label: group.label.clone(),
            children: group
                .children
                .iter()
                .filter_map(|child| form.field(*child).map(|f| f.key().to_string()))
                .collect(),
        })
        .collect();

    Some(FieldView {
        key: field.key().to_string(),
        kind: field.kind(),
        name,
        label: label(form, field),
        description: descriptor.description.clone(),
        component: descriptor.component.clone(),
        attrs,
        data,
        props: descriptor.props.clone(),
        value: field.value().cloned(),
        required: field.required(),
        is_root: field.is_root(),
        messages: field.messages().to_vec(),
        options: field.list_options(),
        buttons: push_button(field),
        groups,
        children,
    })
}

/// Option children are labelled through their owner's `labels`, falling
/// back to the option itself.
fn label(form: &Form, field: &Field) -> Option<String> {
    let (Some(owner), Some(value)) = (field.owner(), field.value()) else {
        return field.label().map(str::to_string);
    };
    let option = option_string(value);
    let from_owner = form
        .field(owner.field())
        .and_then(|owner| owner.descriptor().labels.get(&option).cloned());
    Some(from_owner.unwrap_or(option))
}

fn push_button(field: &Field) -> Vec<ButtonView> {
    let (Some(state), Some(button)) = (field.array_state(), field.descriptor().push_button()) else {
        return Vec::new();
    };
    if !state.extensible || state.checkboxes {
        return Vec::new();
    }
    vec![ButtonView {
        kind: FieldKind::Button,
        action: ButtonAction::Push,
        label: button.label.clone(),
        disabled: !state.can_push(field.children().len()),
        component: button.component.clone(),
    }]
}

fn item_buttons(form: &Form, array: &Field, index: usize) -> Vec<ButtonView> {
    let (Some(state), Some(push)) = (array.array_state(), array.descriptor().push_button()) else {
        return Vec::new();
    };
    let len = array.children().len();
    if state.checkboxes || index < state.tuple_len {
        return Vec::new();
    }
    let component = form
        .components()
        .lookup("button")
        .unwrap_or(&push.component)
        .clone();

    [
        (ButtonAction::MoveUp, state.can_move_up(index, len)),
        (ButtonAction::MoveDown, state.can_move_down(index, len)),
        (ButtonAction::Delete, state.can_remove(index, len)),
    ]
    .into_iter()
    .map(|(action, enabled)| ButtonView {
        kind: FieldKind::Button,
        action,
        label: array
            .descriptor()
            .label_for(action.label_key())
            .unwrap_or_default()
            .to_string(),
        disabled: !enabled,
        component: component.clone(),
    })
    .collect()
}
