//! Serialization of a [`Document`] back to XML text

use super::{Document, Element, Misc, Node};

pub(super) fn write_document(doc: &Document, out: &mut String) {
    if doc.bom {
        out.push('\u{feff}');
    }
    if let Some(decl) = &doc.declaration {
        out.push_str("<?");
        out.push_str(decl);
        out.push_str("?>");
    }
    for misc in &doc.prolog {
        write_misc(misc, out);
    }
    write_element(&doc.root, out);
    for misc in &doc.epilog {
        write_misc(misc, out);
    }
}

fn write_misc(misc: &Misc, out: &mut String) {
    match misc {
        Misc::Whitespace(text) => out.push_str(text),
        Misc::Comment(body) => write_comment(body, out),
        Misc::ProcessingInstruction(body) => write_pi(body, out),
        Misc::DocType(body) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(body.trim_start());
            out.push('>');
        }
    }
}

fn write_comment(body: &str, out: &mut String) {
    out.push_str("<!--");
    out.push_str(body);
    out.push_str("-->");
}

fn write_pi(body: &str, out: &mut String) {
    out.push_str("<?");
    out.push_str(body);
    out.push_str("?>");
}

pub(super) fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.name());
    for (name, raw) in el.raw_attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        // values read from single-quoted attributes may hold a bare `"`
        if raw.contains('"') {
            out.push_str(&raw.replace('"', "&quot;"));
        } else {
            out.push_str(raw);
        }
        out.push('"');
    }
    if el.is_self_closing() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for node in el.children() {
        match node {
            Node::Element(child) => write_element(child, out),
            Node::Text(raw) => out.push_str(raw),
            Node::CData(content) => {
                out.push_str("<![CDATA[");
                out.push_str(content);
                out.push_str("]]>");
            }
            Node::Comment(body) => write_comment(body, out),
            Node::ProcessingInstruction(body) => write_pi(body, out),
        }
    }
    out.push_str("</");
    out.push_str(el.name());
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::super::{Document, Element, Node};

    #[test]
    fn constructed_element_serializes() {
        let mut el = Element::new("unittitle");
        el.set_attribute("id", "a\"b");
        el.push(Node::text("Fish & Chips"));
        let doc = Document::new(el);
        assert_eq!(
            doc.to_xml_string(),
            "<unittitle id=\"a&quot;b\">Fish &amp; Chips</unittitle>"
        );
    }

    #[test]
    fn self_closing_with_new_child_gets_end_tag() {
        let mut doc = Document::parse("<a/>").unwrap();
        doc.root_mut().push(Node::text("x"));
        assert_eq!(doc.to_xml_string(), "<a>x</a>");
    }

    #[test]
    fn cdata_comment_and_pi_round_trip() {
        let src = "<a><![CDATA[<raw>]]><!-- c --><?php echo 1; ?></a>";
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.to_xml_string(), src);
        assert_eq!(doc.root().text(), "<raw>");
    }
}
