//! XML-RPC encoding of calls and decoding of responses

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;

use crate::error::XmlRpcError;
use crate::value::{Params, Value};

/// Decoded `<methodResponse>`
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Params(Value),
    Fault { code: i64, message: String },
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes a `<methodCall>` whose only parameter is a struct of `params`
pub fn encode_call(method: &str, params: &Params) -> Result<String, XmlRpcError> {
    let mut writer = Writer::new(Vec::new());

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    open(&mut writer, "methodCall")?;
    text_element(&mut writer, "methodName", method)?;
    open(&mut writer, "params")?;
    open(&mut writer, "param")?;
    open(&mut writer, "value")?;
    write_struct(&mut writer, params)?;
    close(&mut writer, "value")?;
    close(&mut writer, "param")?;
    close(&mut writer, "params")?;
    close(&mut writer, "methodCall")?;

    String::from_utf8(writer.into_inner()).map_err(|e| XmlRpcError::Encode(e.to_string()))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlRpcError> {
    writer
        .write_event(event)
        .map_err(|e| XmlRpcError::Encode(e.to_string()))
}

fn open(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), XmlRpcError> {
    emit(writer, Event::Start(BytesStart::new(name)))
}

fn close(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), XmlRpcError> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), XmlRpcError> {
    open(writer, name)?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    close(writer, name)
}

fn write_struct(
    writer: &mut Writer<Vec<u8>>,
    members: &BTreeMap<String, Value>,
) -> Result<(), XmlRpcError> {
    open(writer, "struct")?;
    for (name, value) in members {
        open(writer, "member")?;
        text_element(writer, "name", name)?;
        write_value(writer, value)?;
        close(writer, "member")?;
    }
    close(writer, "struct")
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &Value) -> Result<(), XmlRpcError> {
    open(writer, "value")?;
    match value {
        Value::Int(i) => text_element(writer, "int", &i.to_string())?,
        Value::Bool(b) => text_element(writer, "boolean", if *b { "1" } else { "0" })?,
        Value::String(s) => text_element(writer, "string", s)?,
        Value::Double(d) => text_element(writer, "double", &d.to_string())?,
        Value::DateTime(s) => text_element(writer, "dateTime.iso8601", s)?,
        Value::Base64(bytes) => text_element(writer, "base64", &STANDARD.encode(bytes))?,
        Value::Array(items) => {
            open(writer, "array")?;
            open(writer, "data")?;
            for item in items {
                write_value(writer, item)?;
            }
            close(writer, "data")?;
            close(writer, "array")?;
        }
        Value::Struct(members) => write_struct(writer, members)?,
        Value::Nil => emit(writer, Event::Empty(BytesStart::new("nil")))?,
    }
    close(writer, "value")
}

// ============================================================================
// Decoding
// ============================================================================

/// Minimal element tree; XML-RPC documents are small
#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Result<&Element, XmlRpcError> {
        self.children
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| XmlRpcError::Invalid(format!("<{}> without <{}>", self.name, name)))
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }
}

fn parse_document(xml: &str) -> Result<Element, XmlRpcError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Element::new(e.name().as_ref())),
            Ok(Event::Empty(e)) => attach(&mut stack, &mut root, Element::new(e.name().as_ref()))?,
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlRpcError::Parse("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    let text = t.unescape().map_err(|e| XmlRpcError::Parse(e.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(XmlRpcError::Parse(e.to_string())),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlRpcError::Parse("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| XmlRpcError::Parse("empty document".to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlRpcError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlRpcError::Parse("multiple root elements".to_string())),
    }
    Ok(())
}

/// Decodes a `<methodResponse>` document
pub fn decode_response(xml: &str) -> Result<MethodResponse, XmlRpcError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(XmlRpcError::Invalid(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.children_named("fault").next() {
        let value = decode_value(fault.child("value")?)?;
        let members = value
            .as_struct()
            .ok_or_else(|| XmlRpcError::Invalid("fault value is not a struct".to_string()))?;
        let code = members
            .get("faultCode")
            .and_then(Value::as_i64)
            .ok_or_else(|| XmlRpcError::Invalid("fault without faultCode".to_string()))?;
        let message = members
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Ok(MethodResponse::Fault { code, message });
    }

    let param = root.child("params")?.child("param")?;
    Ok(MethodResponse::Params(decode_value(param.child("value")?)?))
}

fn decode_value(element: &Element) -> Result<Value, XmlRpcError> {
    let typed = match element.children.first() {
        Some(typed) => typed,
        // Untyped values are strings
        None => return Ok(Value::String(element.text.clone())),
    };

    let text = typed.text.trim();
    let value = match typed.name.as_str() {
        "int" | "i4" | "i8" => Value::Int(
            text.parse()
                .map_err(|_| XmlRpcError::Invalid(format!("bad integer {:?}", text)))?,
        ),
        "boolean" => match text {
            "1" => Value::Bool(true),
            "0" => Value::Bool(false),
            other => return Err(XmlRpcError::Invalid(format!("bad boolean {:?}", other))),
        },
        "string" => Value::String(typed.text.clone()),
        "double" => Value::Double(
            text.parse()
                .map_err(|_| XmlRpcError::Invalid(format!("bad double {:?}", text)))?,
        ),
        "dateTime.iso8601" => Value::DateTime(text.to_string()),
        "base64" => {
            let compact: String = typed.text.split_whitespace().collect();
            Value::Base64(
                STANDARD
                    .decode(compact)
                    .map_err(|e| XmlRpcError::Invalid(format!("bad base64: {}", e)))?,
            )
        }
        "array" => Value::Array(
            typed
                .child("data")?
                .children_named("value")
                .map(decode_value)
                .collect::<Result<_, _>>()?,
        ),
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children_named("member") {
                let name = member.child("name")?.text.trim().to_string();
                members.insert(name, decode_value(member.child("value")?)?);
            }
            Value::Struct(members)
        }
        "nil" => Value::Nil,
        other => return Err(XmlRpcError::Invalid(format!("unknown type <{}>", other))),
    };
    Ok(value)
}
