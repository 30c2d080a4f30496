//! A parsed form: the field tree plus everything that edits it.

use crate::arrays;
use crate::components::Components;
use crate::config::FormOptions;
use crate::descriptor::{Descriptor, DescriptorCache};
use crate::error::{FormError, Result};
use crate::field::{
    ArrayState, Attrs, Field, FieldArena, FieldId, FieldKind, FieldPath, Message, Owner, ParserKind,
    PathSegment, Severity, option_string,
};
use crate::id::UniqueId;
use crate::parser::{self, ParseContext, Parser};
use crate::pattern;
use crate::schema::JsonSchema;
use crate::value;
use crate::view::{self, FieldView};
use serde::Deserialize;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, trace};

/// What a UI control reports when the user edits it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InputEvent {
    /// Text of the control.
    pub value: Option<String>,
    /// State of a checkbox or radio control.
    pub checked: Option<bool>,
}

impl InputEvent {
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            checked: None,
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            value: None,
            checked: Some(checked),
        }
    }
}

#[derive(Debug)]
pub struct Form {
    schema: JsonSchema,
    options: FormOptions,
    components: Components,
    descriptors: DescriptorCache,
    ids: UniqueId,
    arena: FieldArena,
    root: Option<FieldId>,
    initial_model: Option<Value>,
}

impl Form {
    pub fn new(schema: JsonSchema, model: Option<Value>) -> Self {
        Self::with_options(schema, model, FormOptions::default())
    }

    pub fn with_options(schema: JsonSchema, model: Option<Value>, options: FormOptions) -> Self {
        let components = options.components();
        Self::with_components(schema, model, options, components)
    }

    /// Builds a form against an explicit component registry.
    pub fn with_components(
        schema: JsonSchema,
        model: Option<Value>,
        options: FormOptions,
        components: Components,
    ) -> Self {
        let mut form = Self {
            schema,
            ids: UniqueId::new(options.id_prefix.clone()),
            options,
            components,
            descriptors: DescriptorCache::new(),
            arena: FieldArena::default(),
            root: None,
            initial_model: model.clone(),
        };
        form.parse(model);
        form
    }

    /// Rebuilds the whole tree from `model`. Keys restart from 1.
    pub fn parse(&mut self, model: Option<Value>) {
        self.arena.clear();
        self.ids.reset();

        let mut parser = Parser {
            components: &self.components,
            descriptors: &mut self.descriptors,
            ids: &mut self.ids,
            arena: &mut self.arena,
        };
        let cx = ParseContext::root(Some(&self.options.descriptor));
        self.root = parser.parse(&self.schema, model.as_ref(), cx);

        debug!(
            fields = self.arena.len(),
            descriptors = self.descriptors.len(),
            "parsed form"
        );
    }

    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Shared descriptor of the schema node at `pointer`, e.g. `#/properties/name`.
    pub fn descriptor(&self, pointer: &str) -> Option<&Descriptor> {
        self.descriptors.get(pointer).map(Rc::as_ref)
    }

    pub fn root_id(&self) -> Option<FieldId> {
        self.root
    }

    pub fn root(&self) -> Option<&Field> {
        self.root.and_then(|id| self.arena.get(id))
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.arena.get(id)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.arena.iter()
    }

    /// The model value held by the root field.
    pub fn value(&self) -> Option<&Value> {
        self.root().and_then(Field::value)
    }

    /// Field at a dotted path such as `user.tags[1]`.
    pub fn find(&self, path: &str) -> Option<&Field> {
        let path = FieldPath::parse(path);
        let mut current = self.root()?;
        for segment in path.segments() {
            current = current
                .children
                .iter()
                .filter_map(|id| self.arena.get(*id))
                .find(|child| child.segment.as_ref() == Some(segment))?;
        }
        Some(current)
    }

    pub fn path(&self, id: FieldId) -> FieldPath {
        let mut segments = Vec::new();
        let mut current = self.arena.get(id);
        while let Some(field) = current {
            segments.extend(field.segment.clone());
            current = field.parent.and_then(|parent| self.arena.get(parent));
        }
        let mut path = FieldPath::root();
        for segment in segments.into_iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Form control name of a field; option children share their owner's.
    pub fn name(&self, id: FieldId) -> String {
        self.path(id).to_string()
    }

    /// Attributes of a field with the live ones filled in.
    pub fn attrs(&self, id: FieldId) -> Option<Attrs> {
        let field = self.arena.get(id)?;
        let path = self.path(id);
        let mut attrs = field.attrs.clone();

        let mut element_id = self.ids.element_id(&path);
        if let Some(owner) = field.owner {
            let index = self
                .arena
                .get(owner.field())
                .and_then(|parent| parent.children.iter().position(|child| *child == id));
            if let Some(index) = index {
                element_id = format!("{element_id}-{index}");
            }
        }
        attrs.id = Some(element_id);
        if !path.is_root() {
            attrs.name = Some(path.to_string());
        }

        match field.kind {
            FieldKind::Boolean => attrs.checked = Some(value::boolean(field.value.as_ref())),
            FieldKind::Radio | FieldKind::Checkbox => {
                attrs.checked = Some(self.is_checked(field));
                attrs.value = field.value.as_ref().map(option_string);
            }
            FieldKind::Object | FieldKind::Array | FieldKind::Enum => {}
            _ => {
                if attrs.value.is_none() {
                    attrs.value = value::string(field.value.as_ref());
                }
            }
        }
        Some(attrs)
    }

    fn is_checked(&self, option: &Field) -> bool {
        let (Some(owner), Some(value)) = (option.owner, option.value.as_ref()) else {
            return false;
        };
        let held = self.arena.get(owner.field()).and_then(Field::value);
        match owner {
            Owner::Enum(_) => held.is_some_and(|held| value::same(held, value)),
            Owner::Checkbox(_) => arrays::contains(&value::array(held), value),
        }
    }

    /// Coerces `raw` with the field's parser and stores it.
    ///
    /// Option children write into their owner: a radio replaces the enum
    /// value, a checkbox adds (`true`) or removes (`false`) its option from
    /// the array value. Object and array fields rebuild their children.
    pub fn set_value(&mut self, id: FieldId, raw: Option<Value>) -> Result<()> {
        let field = self.arena.get(id).ok_or(FormError::FieldNotFound(id))?;
        let parsed = parser::parse_value(field.parser, &field.schema, raw.as_ref());
        let structural = matches!(field.parser, ParserKind::Object | ParserKind::Array);

        match field.owner {
            Some(Owner::Enum(owner)) => self.commit(owner, parsed),
            Some(Owner::Checkbox(owner)) => {
                let option = field.value.clone();
                let mut values = value::array(self.arena.get(owner).and_then(Field::value));
                if let Some(option) = option {
                    arrays::toggle(&mut values, &option, value::boolean(raw.as_ref()));
                }
                self.commit(owner, Some(Value::Array(values)));
            }
            None if structural => {
                self.rebuild(id, parsed);
                self.propagate(id);
            }
            None => self.commit(id, parsed),
        }
        Ok(())
    }

    /// Applies a UI event to the field it came from.
    pub fn handle_event(&mut self, id: FieldId, event: &InputEvent) -> Result<()> {
        let field = self.arena.get(id).ok_or(FormError::FieldNotFound(id))?;
        match field.kind {
            FieldKind::Boolean | FieldKind::Checkbox => {
                self.set_value(id, Some(Value::Bool(event.checked.unwrap_or(false))))
            }
            FieldKind::Radio => {
                if event.checked == Some(false) {
                    return Ok(());
                }
                let option = field.value.clone();
                self.set_value(id, option)
            }
            FieldKind::List => {
                let picked = event
                    .value
                    .as_deref()
                    .and_then(|text| field.options.iter().find(|o| option_string(o) == text))
                    .cloned();
                match picked {
                    Some(option) => {
                        self.commit(id, Some(option));
                        Ok(())
                    }
                    None => self.set_value(id, event.value.clone().map(Value::String)),
                }
            }
            _ => self.set_value(id, event.value.clone().map(Value::String)),
        }
    }

    /// Stores an already coerced value and refreshes the ancestors.
    fn commit(&mut self, id: FieldId, value: Option<Value>) {
        if let Some(field) = self.arena.get_mut(id) {
            trace!(key = %field.key, value = ?value, "commit");
            field.value = value;
        }
        self.propagate(id);
    }

    fn propagate(&mut self, id: FieldId) {
        let mut current = id;
        while let Some(parent) = self.arena.get(current).and_then(Field::parent) {
            self.refresh(parent);
            current = parent;
        }
    }

    /// Recomputes a structural value from its children.
    fn refresh(&mut self, id: FieldId) {
        let Some(field) = self.arena.get(id) else {
            return;
        };
        let value = match field.parser {
            ParserKind::Object => {
                let mut map = value::object(field.value.as_ref());
                for child in field.children.iter().filter_map(|c| self.arena.get(*c)) {
                    if let Some(PathSegment::Property(key)) = &child.segment {
                        match &child.value {
                            Some(v) => map.insert(key.clone(), v.clone()),
                            None => map.remove(key),
                        };
                    }
                }
                Value::Object(map)
            }
            ParserKind::Array if field.array.as_ref().is_some_and(|a| !a.checkboxes) => {
                Value::Array(value::defined(
                    field
                        .children
                        .iter()
                        .map(|c| self.arena.get(*c).and_then(|child| child.value.clone())),
                ))
            }
            _ => return,
        };
        if let Some(field) = self.arena.get_mut(id) {
            field.value = Some(value);
        }
    }

    /// Reparses a field in place from `model`, keeping its key.
    fn rebuild(&mut self, id: FieldId, model: Option<Value>) {
        let path = self.path(id);
        let Some(field) = self.arena.get(id) else {
            return;
        };
        let schema = Rc::clone(&field.schema);
        let key = field.key.clone();
        let children = field.children.clone();
        let cx = ParseContext {
            parent: field.parent,
            segment: field.segment.clone(),
            pointer: field.pointer.clone(),
            owner: field.owner,
            required: field.required,
            overrides: self.options.descriptor.resolve(&path),
        };
        for child in children {
            self.arena.free(child);
        }

        let mut parser = Parser {
            components: &self.components,
            descriptors: &mut self.descriptors,
            ids: &mut self.ids,
            arena: &mut self.arena,
        };
        parser.parse_into(id, &schema, model.as_ref(), cx);
        if let Some(field) = self.arena.get_mut(id) {
            field.key = key;
        }
    }

    fn array_field(&self, id: FieldId) -> Result<(&Field, &ArrayState)> {
        let field = self.arena.get(id).ok_or(FormError::FieldNotFound(id))?;
        let state = field.array.as_ref().ok_or(FormError::NotAnArray(id))?;
        Ok((field, state))
    }

    /// Appends a new item parsed from the item schema and returns its id.
    pub fn push_item(&mut self, id: FieldId) -> Result<FieldId> {
        let (field, state) = self.array_field(id)?;
        let len = field.children.len();
        if !state.extensible || state.checkboxes {
            return Err(FormError::NoItemSchema(id));
        }
        if !state.can_push(len) {
            return Err(limit(id, "push", format!("maxItems is {}", state.max_items.unwrap_or(len))));
        }

        let schema = Rc::clone(&field.schema);
        let (item, pointer) =
            parser::item_schema(&schema, &field.pointer, len).ok_or(FormError::NoItemSchema(id))?;
        let path = self.path(id);
        let overrides = self
            .options
            .descriptor
            .resolve(&path)
            .and_then(|o| o.item(len));

        let mut parser = Parser {
            components: &self.components,
            descriptors: &mut self.descriptors,
            ids: &mut self.ids,
            arena: &mut self.arena,
        };
        let child = parser
            .parse(item, None, ParseContext::item(id, len, pointer, overrides))
            .ok_or(FormError::NoItemSchema(id))?;

        if let Some(field) = self.arena.get_mut(id) {
            field.children.push(child);
        }
        self.refresh(id);
        self.propagate(id);
        debug!(array = %id, index = len, "pushed item");
        Ok(child)
    }

    pub fn remove_item(&mut self, id: FieldId, index: usize) -> Result<()> {
        let (field, state) = self.array_field(id)?;
        let len = field.children.len();
        if !state.can_remove(index, len) {
            let reason = if index >= len {
                format!("no item at index {index}")
            } else if index < state.tuple_len {
                format!("item {index} is positional")
            } else {
                format!("minItems is {}", state.min_items)
            };
            return Err(limit(id, "remove", reason));
        }

        let mut removed = None;
        if let Some(field) = self.arena.get_mut(id) {
            removed = Some(field.children.remove(index));
        }
        if let Some(child) = removed {
            self.arena.free(child);
        }
        self.reindex(id);
        self.refresh(id);
        self.propagate(id);
        debug!(array = %id, index, "removed item");
        Ok(())
    }

    pub fn move_item_up(&mut self, id: FieldId, index: usize) -> Result<()> {
        let (field, state) = self.array_field(id)?;
        if !state.can_move_up(index, field.children.len()) {
            return Err(limit(id, "move up", format!("item {index} cannot move up")));
        }
        self.swap_items(id, index - 1, index);
        debug!(array = %id, index, "moved item up");
        Ok(())
    }

    pub fn move_item_down(&mut self, id: FieldId, index: usize) -> Result<()> {
        let (field, state) = self.array_field(id)?;
        if !state.can_move_down(index, field.children.len()) {
            return Err(limit(id, "move down", format!("item {index} cannot move down")));
        }
        self.swap_items(id, index, index + 1);
        debug!(array = %id, index, "moved item down");
        Ok(())
    }

    fn swap_items(&mut self, id: FieldId, a: usize, b: usize) {
        if let Some(field) = self.arena.get_mut(id) {
            arrays::swap(&mut field.children, a, b);
        }
        self.reindex(id);
        self.refresh(id);
        self.propagate(id);
    }

    /// Renumbers item segments after the children of an array moved.
    fn reindex(&mut self, id: FieldId) {
        let children = self
            .arena
            .get(id)
            .map(|field| field.children.clone())
            .unwrap_or_default();
        for (index, child) in children.into_iter().enumerate() {
            if let Some(child) = self.arena.get_mut(child) {
                child.segment = Some(PathSegment::Index(index));
            }
        }
    }

    /// Reparses from the model the form was created with.
    pub fn reset(&mut self) {
        self.parse(self.initial_model.clone());
    }

    /// Reparses with no model, leaving only defaults and constants.
    pub fn clear(&mut self) {
        self.parse(None);
    }

    pub fn add_message(&mut self, id: FieldId, message: Message) -> Result<()> {
        let field = self.arena.get_mut(id).ok_or(FormError::FieldNotFound(id))?;
        field.add_message(message);
        Ok(())
    }

    pub fn clear_messages(&mut self, id: FieldId) -> Result<()> {
        let field = self.arena.get_mut(id).ok_or(FormError::FieldNotFound(id))?;
        field.clear_messages();
        Ok(())
    }

    /// Checks every field against its attributes and records an error
    /// message on each field that fails. Returns whether all fields passed.
    pub fn validate(&mut self) -> bool {
        let ids: Vec<FieldId> = self.arena.iter().map(Field::id).collect();
        let mut valid = true;
        for id in ids {
            let errors = self.constraint_errors(id);
            valid &= errors.is_empty();
            if let Some(field) = self.arena.get_mut(id) {
                field.messages.retain(|m| m.severity != Severity::Error);
                field.messages.extend(errors);
            }
        }
        debug!(valid, "validated form");
        valid
    }

    fn constraint_errors(&self, id: FieldId) -> Vec<Message> {
        let (Some(field), Some(attrs)) = (self.arena.get(id), self.attrs(id)) else {
            return Vec::new();
        };
        if field.owner.is_some() {
            return Vec::new();
        }

        let mut errors = Vec::new();
        match field.parser {
            ParserKind::Object => {}
            ParserKind::Array => {
                let len = value::array(field.value.as_ref()).len();
                if let Some(state) = &field.array {
                    if len < state.min_items {
                        errors.push(Message::error(format!("Add at least {} items", state.min_items)));
                    }
                    if let Some(max) = state.max_items.filter(|max| len > *max) {
                        errors.push(Message::error(format!("Keep at most {max} items")));
                    }
                }
            }
            _ => {
                let text = attrs
                    .value
                    .clone()
                    .or_else(|| value::string(field.value.as_ref()))
                    .unwrap_or_default();
                if field.value.is_none() || text.is_empty() {
                    if field.required {
                        errors.push(Message::error("This field is required"));
                    }
                    return errors;
                }
                if let Some(number) = value::number(field.value.as_ref()) {
                    if let Some(min) = attrs.min.filter(|min| number < min.as_f64()) {
                        errors.push(Message::error(format!("Value must be at least {min}")));
                    }
                    if let Some(max) = attrs.max.filter(|max| number > max.as_f64()) {
                        errors.push(Message::error(format!("Value must be at most {max}")));
                    }
                }
                let chars = text.chars().count() as u64;
                if let Some(min) = attrs.minlength.filter(|min| chars < *min) {
                    errors.push(Message::error(format!("Use at least {min} characters")));
                }
                if let Some(max) = attrs.maxlength.filter(|max| chars > *max) {
                    errors.push(Message::error(format!("Use at most {max} characters")));
                }
                if let Some(source) = &attrs.pattern {
                    if pattern::compile(source).is_ok_and(|re| !re.is_match(&text)) {
                        errors.push(Message::error("Value does not match the expected format"));
                    }
                }
            }
        }
        errors
    }

    /// Render tree of the whole form.
    pub fn view(&self) -> Option<FieldView> {
        self.root.and_then(|id| self.view_of(id))
    }

    pub fn view_of(&self, id: FieldId) -> Option<FieldView> {
        view::build(self, id)
    }
}

fn limit(field: FieldId, action: &'static str, reason: String) -> FormError {
    FormError::ArrayLimit {
        field,
        action,
        reason,
    }
}
