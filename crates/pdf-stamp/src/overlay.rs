use crate::geometry::{clamp_baseline, page_dimensions};
use crate::metrics::string_width;
use crate::types::{Result, StampSpec};
use lopdf::{Dictionary, Document, Object, Stream};

/// The built-in Type1 font every stamp is set in.
pub const STAMP_FONT: &str = "Helvetica-Bold";

/// Resource name of the stamp font inside the overlay page.
const FONT_RESOURCE: &str = "F1";

/// Build the single-page overlay document for a stamp.
///
/// The page is letter-sized in the spec's orientation; its content stream
/// draws the stamp text (and underline) at the spec's position, with the
/// baseline clamped so the text band stays inside the page.
pub fn build_overlay(spec: &StampSpec) -> Result<Document> {
    spec.validate()?;

    let (width, height) = page_dimensions(spec.orientation);
    let content = stamp_content(spec, height);

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(STAMP_FONT.as_bytes().to_vec())),
    ]));
    let fonts = Dictionary::from_iter(vec![(FONT_RESOURCE, Object::Reference(font_id))]);
    let resources = Dictionary::from_iter(vec![("Font", Object::Dictionary(fonts))]);

    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

fn stamp_content(spec: &StampSpec, page_height: f64) -> String {
    let (x, y) = spec.position;
    let size = spec.font_size as f64;
    let y = clamp_baseline(y, size, page_height);
    let (r, g, b) = spec.color.rgb();
    let width = string_width(&spec.text, size);
    let text = escape_pdf_string(&spec.text);

    let mut ops = String::from("q\n");
    ops.push_str(&format!("{r} {g} {b} rg\n{r} {g} {b} RG\n"));

    match spec.angle {
        Some(angle) => {
            // Local frame centered on the anchor: translate, rotate, draw
            // everything around the local origin.
            let (sin, cos) = angle.to_radians().sin_cos();
            ops.push_str(&format!(
                "q\n{:.6} {:.6} {:.6} {:.6} {:.2} {:.2} cm\n",
                cos, sin, -sin, cos, x, y
            ));
            ops.push_str(&format!(
                "BT\n/{} {} Tf\n{:.2} 0 Td\n({text}) Tj\nET\n",
                FONT_RESOURCE,
                spec.font_size,
                -width / 2.0
            ));
            if spec.underline {
                ops.push_str(&format!(
                    "1 w\n{:.2} -2 m\n{:.2} -2 l\nS\n",
                    -width / 2.0,
                    width / 2.0
                ));
            }
            ops.push_str("Q\n");
        }
        None => {
            ops.push_str(&format!(
                "BT\n/{} {} Tf\n{:.2} {:.2} Td\n({text}) Tj\nET\n",
                FONT_RESOURCE,
                spec.font_size,
                x - width / 2.0,
                y
            ));
            if spec.underline {
                ops.push_str(&format!(
                    "1 w\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\n",
                    x - width / 2.0,
                    y - 2.0,
                    x + width / 2.0,
                    y - 2.0
                ));
            }
        }
    }

    ops.push_str("Q\n");
    ops
}

/// Escape the characters PDF literal strings reserve.
fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
