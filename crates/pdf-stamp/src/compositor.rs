use crate::overlay::build_overlay;
use crate::types::{Result, StampError, StampSpec};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Burn a stamp onto every page of `base`, returning a new document.
///
/// The overlay is staged as a single in-memory document, converted into a
/// Form XObject, and painted on top of each page's existing content inside
/// an isolated graphics state. The caller's document is never mutated; the
/// staged overlay is dropped on every exit path.
pub fn composite(base: &Document, spec: &StampSpec) -> Result<Document> {
    spec.validate()?;
    let overlay = build_overlay(spec)?;

    let mut output = base.clone();
    let xobject_id = import_overlay_xobject(&mut output, &overlay)?;

    let page_ids: Vec<ObjectId> = output.get_pages().into_values().collect();
    for page_id in page_ids {
        apply_overlay_to_page(&mut output, page_id, xobject_id)?;
    }
    Ok(output)
}

/// Async wrapper: stamping is CPU-bound, so it runs on the blocking pool.
pub async fn stamp_document(base: &Document, spec: &StampSpec) -> Result<Document> {
    let base = base.clone();
    let spec = spec.clone();
    tokio::task::spawn_blocking(move || composite(&base, &spec)).await?
}

/// Turn the overlay's single page into a Form XObject inside `output`,
/// carrying its content and resources along.
fn import_overlay_xobject(output: &mut Document, overlay: &Document) -> Result<ObjectId> {
    let page_id = overlay
        .get_pages()
        .into_values()
        .next()
        .ok_or(StampError::EmptyOverlay)?;
    let page_dict = overlay.get_dictionary(page_id)?;

    let media_box = page_dict.get(b"MediaBox")?.as_array()?.clone();
    let content = page_content(overlay, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));
    xobject_dict.set("BBox", Object::Array(media_box));

    let mut cache = HashMap::new();
    if let Ok(resources) = page_dict.get(b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, overlay, resources, &mut cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content)))
}

/// Register the stamp XObject on one page and repaint: existing content is
/// wrapped in `q .. Q` and the stamp painted after it, on top.
fn apply_overlay_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_id: ObjectId,
) -> Result<()> {
    let name = register_stamp_xobject(doc, page_id, xobject_id)?;

    let prologue = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let epilogue_ops = format!("Q\nq\n/{name} Do\nQ\n");
    let epilogue = doc.add_object(Stream::new(Dictionary::new(), epilogue_ops.into_bytes()));

    let contents = doc.get_dictionary(page_id)?.get(b"Contents").ok().cloned();
    let existing = match contents {
        Some(Object::Reference(id)) => vec![Object::Reference(id)],
        Some(Object::Array(array)) => array,
        // A stream held inline on the page moves behind a reference so it
        // can take its place in the rebuilt contents array.
        Some(Object::Stream(stream)) => vec![Object::Reference(doc.add_object(stream))],
        _ => Vec::new(),
    };

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(prologue));
    contents.extend(existing);
    contents.push(Object::Reference(epilogue));

    let mut updated = doc.get_dictionary(page_id)?.clone();
    updated.set("Contents", Object::Array(contents));
    doc.objects.insert(page_id, Object::Dictionary(updated));
    Ok(())
}

/// Add the XObject to the page's resource dictionary under a name the page
/// does not already use, and return that name.
fn register_stamp_xobject(
    doc: &mut Document,
    page_id: ObjectId,
    xobject_id: ObjectId,
) -> Result<String> {
    let mut resources = page_resources(doc, page_id)?;
    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        _ => Dictionary::new(),
    };

    let mut counter = 0usize;
    let name = loop {
        let candidate = format!("Stamp{counter}");
        if !xobjects.has(candidate.as_bytes()) {
            break candidate;
        }
        counter += 1;
    };

    xobjects.set(name.as_bytes(), Object::Reference(xobject_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut updated = doc.get_dictionary(page_id)?.clone();
    updated.set("Resources", Object::Dictionary(resources));
    doc.objects.insert(page_id, Object::Dictionary(updated));
    Ok(name)
}

/// The page's effective resource dictionary. Resources may sit on the page,
/// behind a reference, or be inherited from an ancestor Pages node.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut current = page_id;
    loop {
        let dict = doc.get_dictionary(current)?;
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return Ok(resources.clone()),
            Ok(Object::Reference(id)) => return Ok(doc.get_dictionary(*id)?.clone()),
            _ => {}
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return Ok(Dictionary::new()),
        }
    }
}

/// Content stream bytes of a page, concatenating multiple streams and
/// falling back to raw bytes when a stream is not compressed.
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = page_dict.get(b"Contents")?;

    match contents {
        Object::Reference(id) => {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                match stream.decompressed_content() {
                    Ok(content) => Ok(content),
                    Err(_) => Ok(stream.content.clone()),
                }
            } else {
                Ok(Vec::new())
            }
        }
        Object::Array(array) => {
            let mut result = Vec::new();
            for obj in array {
                if let Object::Reference(id) = obj
                    && let Ok(stream) = doc.get_object(*id)?.as_stream()
                {
                    let content = match stream.decompressed_content() {
                        Ok(content) => content,
                        Err(_) => stream.content.clone(),
                    };
                    result.extend_from_slice(&content);
                    result.push(b'\n');
                }
            }
            Ok(result)
        }
        _ => Ok(Vec::new()),
    }
}

/// Deep copy an object from source to output document, following references.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let referenced = source.get_object(*id)?;
            let copied = copy_object_deep(output, source, referenced, cache)?;
            let new_id = output.add_object(copied);
            cache.insert(*id, new_id);
            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(array) => {
            let mut new_array = Vec::with_capacity(array.len());
            for item in array {
                new_array.push(copy_object_deep(output, source, item, cache)?);
            }
            Ok(Object::Array(new_array))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        _ => Ok(obj.clone()),
    }
}
