//! Form definition parsing

use std::collections::HashMap;

use crate::error::TranscoderError;

const ODK_NAMESPACE: &str = "http://www.opendatakit.org/xforms";

/// One form definition, reduced to what transcoding needs: the mapping from
/// short per-field tags to canonical field names.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    /// Form identifier
    pub id: String,

    tag_to_field: HashMap<String, String>,
}

impl FormDefinition {
    /// Parse a form definition from the endpoint's XML representation.
    ///
    /// Every element carrying an `odk:tag` attribute contributes one mapping
    /// from the tag value to the element name.
    pub fn parse(form_id: &str, xml: &str) -> Result<Self, TranscoderError> {
        let document = roxmltree::Document::parse(xml)
            .map_err(|e| TranscoderError::form_definition(form_id, e.to_string()))?;

        let mut tag_to_field = HashMap::new();
        for node in document.descendants().filter(|n| n.is_element()) {
            if let Some(tag) = node.attribute((ODK_NAMESPACE, "tag")) {
                tag_to_field.insert(tag.to_string(), node.tag_name().name().to_string());
            }
        }

        Ok(Self {
            id: form_id.to_string(),
            tag_to_field,
        })
    }

    /// Build a definition from explicit tag mappings (tests, fixtures).
    pub fn with_tags<'a>(
        form_id: &str,
        tags: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            id: form_id.to_string(),
            tag_to_field: tags
                .into_iter()
                .map(|(tag, field)| (tag.to_string(), field.to_string()))
                .collect(),
        }
    }

    /// Canonical field name for a short tag, if the form defines one.
    pub fn field_for_tag(&self, tag: &str) -> Option<&str> {
        self.tag_to_field.get(tag).map(String::as_str)
    }

    /// Number of tagged fields in the form.
    pub fn tagged_field_count(&self) -> usize {
        self.tag_to_field.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM_XML: &str = r#"<?xml version="1.0"?>
<h:html xmlns="http://www.w3.org/2002/xforms"
        xmlns:h="http://www.w3.org/1999/xhtml"
        xmlns:odk="http://www.opendatakit.org/xforms">
  <h:head>
    <h:title>Simple test form</h:title>
    <model>
      <instance>
        <sms_test_form id="sms_test_form" odk:delimiter=";" odk:prefix="d_test" version="1">
          <deviceid odk:tag="did"/>
          <yesno odk:tag="yn"/>
          <howmany odk:tag="hm"/>
          <meta>
            <instanceID/>
          </meta>
        </sms_test_form>
      </instance>
    </model>
  </h:head>
</h:html>"#;

    #[test]
    fn test_parse_extracts_tag_mappings() {
        let form = FormDefinition::parse("sms_test_form", FORM_XML).unwrap();
        assert_eq!(form.tagged_field_count(), 3);
        assert_eq!(form.field_for_tag("did"), Some("deviceid"));
        assert_eq!(form.field_for_tag("yn"), Some("yesno"));
        assert_eq!(form.field_for_tag("hm"), Some("howmany"));
        assert_eq!(form.field_for_tag("zz"), None);
    }

    #[test]
    fn test_parse_rejects_broken_xml() {
        assert!(FormDefinition::parse("f", "<unclosed").is_err());
    }
}
