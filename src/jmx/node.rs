use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::{JmxForgeError, Result};

/// 通用的带属性标记节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// 序列化为缩进两个空格的标记文本（不含 XML 声明）
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| JmxForgeError::XmlError(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let start = BytesStart::new(self.tag.as_str()).with_attributes(
            self.attributes
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );

        let text = self.text.as_deref().filter(|t| !t.is_empty());
        if text.is_none() && self.children.is_empty() {
            return emit(writer, Event::Empty(start));
        }

        emit(writer, Event::Start(start))?;
        if let Some(text) = text {
            emit(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        emit(writer, Event::End(BytesEnd::new(self.tag.as_str())))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| JmxForgeError::XmlError(e.to_string()))
}

pub fn string_prop(name: &str, value: impl Into<String>) -> XmlNode {
    XmlNode::new("stringProp").attr("name", name).text(value)
}

pub fn bool_prop(name: &str, value: bool) -> XmlNode {
    XmlNode::new("boolProp")
        .attr("name", name)
        .text(value.to_string())
}

pub fn int_prop(name: &str, value: i64) -> XmlNode {
    XmlNode::new("intProp")
        .attr("name", name)
        .text(value.to_string())
}

pub fn collection_prop(name: &str, items: impl IntoIterator<Item = XmlNode>) -> XmlNode {
    XmlNode::new("collectionProp")
        .attr("name", name)
        .children(items)
}

pub fn element_prop(name: &str, element_type: &str) -> XmlNode {
    XmlNode::new("elementProp")
        .attr("name", name)
        .attr("elementType", element_type)
}
