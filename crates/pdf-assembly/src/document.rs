use crate::types::{AssemblyError, Result, SourceId};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::path::Path;

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Load multiple PDF documents
pub async fn load_multiple_pdfs(paths: &[impl AsRef<Path>]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.push(load_pdf(path).await?);
    }
    Ok(documents)
}

/// Save an assembled document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, AssemblyError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Page object ids of a document, in page order.
pub fn page_object_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Materialize an output page list into a fresh document.
///
/// `sources` is indexed by `SourceId`; each `(source, page index)` reference
/// is resolved to a page object and deep-copied into the output. A per-source
/// object cache keeps resources shared between pages of one source shared in
/// the output as well.
pub fn build_document(sources: &[Document], pages: &[(SourceId, usize)]) -> Result<Document> {
    let (mut output, pages_id) = new_output_document();

    let source_pages: Vec<Vec<ObjectId>> = sources.iter().map(page_object_ids).collect();
    let mut caches: Vec<HashMap<ObjectId, ObjectId>> = vec![HashMap::new(); sources.len()];

    let mut kids = Vec::new();
    for &(source, page_index) in pages {
        let index = source.0 as usize;
        let page_ids = source_pages
            .get(index)
            .ok_or(AssemblyError::UnknownSource(source))?;
        let page_id = *page_ids
            .get(page_index)
            .ok_or(AssemblyError::PageOutOfBounds {
                page: page_index + 1,
            })?;
        let copied = copy_page(&mut output, &sources[index], page_id, pages_id, &mut caches[index])?;
        kids.push(Object::Reference(copied));
    }

    finish_output_document(&mut output, pages_id, kids);
    Ok(output)
}

/// Fresh output document plus the reserved id of its page tree root.
pub(crate) fn new_output_document() -> (Document, ObjectId) {
    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    (output, pages_id)
}

/// Install the page tree and catalog around the collected page references.
pub(crate) fn finish_output_document(output: &mut Document, pages_id: ObjectId, kids: Vec<Object>) {
    let count = kids.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    output.trailer.set("Root", catalog_id);
}

/// Copy one page of `source` into `output`, reparenting it under `parent_id`.
/// Everything the page dictionary references (contents, resources, fonts)
/// follows along through the cache.
pub(crate) fn copy_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    parent_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;

    let mut copied = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if key.as_slice() == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    copied.set("Parent", Object::Reference(parent_id));

    Ok(output.add_object(Object::Dictionary(copied)))
}

/// Deep copy an object from source to output document, following references.
/// The cache keeps any object shared in the source shared in the output.
pub(crate) fn copy_object_deep(
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
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(copy_object_deep(output, source, item, cache)?);
            }
            Ok(Object::Array(new_arr))
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
