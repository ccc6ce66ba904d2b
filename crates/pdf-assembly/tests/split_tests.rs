use lopdf::{Dictionary, Document, Object, Stream};
use pdf_assembly::*;

fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page in 0..num_pages {
        let marker = format!("q Q % page:{page}");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), marker.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

fn page_markers(doc: &Document) -> Vec<String> {
    page_object_ids(doc)
        .into_iter()
        .map(|page_id| {
            let dict = doc.get_dictionary(page_id).unwrap();
            let content_id = dict.get(b"Contents").unwrap().as_reference().unwrap();
            let stream = doc.get_object(content_id).unwrap().as_stream().unwrap();
            String::from_utf8(stream.content.clone()).unwrap()
        })
        .collect()
}

#[test]
fn test_split_two_ranges() {
    let source = create_test_pdf(9);
    let ranges = parse_ranges("1-3,7-9").unwrap();

    let outputs = split_document(&source, &ranges).unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(
        page_markers(&outputs[0]),
        vec!["q Q % page:0", "q Q % page:1", "q Q % page:2"]
    );
    assert_eq!(
        page_markers(&outputs[1]),
        vec!["q Q % page:6", "q Q % page:7", "q Q % page:8"]
    );
}

#[test]
fn test_split_single_page_range() {
    let source = create_test_pdf(4);
    let ranges = parse_ranges("3").unwrap();

    let outputs = split_document(&source, &ranges).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(page_markers(&outputs[0]), vec!["q Q % page:2"]);
}

#[test]
fn test_split_overlapping_ranges_kept_as_given() {
    let source = create_test_pdf(5);
    let ranges = parse_ranges("1-3,2-4").unwrap();

    let outputs = split_document(&source, &ranges).unwrap();
    assert_eq!(outputs[0].get_pages().len(), 3);
    assert_eq!(outputs[1].get_pages().len(), 3);
    assert_eq!(page_markers(&outputs[1])[0], "q Q % page:1");
}

#[test]
fn test_split_out_of_bounds_names_first_offending_page() {
    let source = create_test_pdf(9);

    let ranges = parse_ranges("8-10").unwrap();
    assert!(matches!(
        split_document(&source, &ranges),
        Err(AssemblyError::PageOutOfBounds { page: 10 })
    ));

    let ranges = parse_ranges("12-14").unwrap();
    assert!(matches!(
        split_document(&source, &ranges),
        Err(AssemblyError::PageOutOfBounds { page: 12 })
    ));
}

#[test]
fn test_split_batch_is_all_or_nothing() {
    let source = create_test_pdf(9);
    // A bad range anywhere in the batch fails the whole call, even when
    // earlier ranges are valid.
    let ranges = parse_ranges("1-3,8-10").unwrap();
    assert!(split_document(&source, &ranges).is_err());
}

#[tokio::test]
async fn test_split_to_files_names_by_range() {
    let source = create_test_pdf(9);
    let ranges = parse_ranges("1-3,5,7-9").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let stem = dir.path().join("part");
    let written = split_to_files(&source, &ranges, &stem).await.unwrap();

    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["part-1-3.pdf", "part-5.pdf", "part-7-9.pdf"]);

    for (path, expected_pages) in written.iter().zip([3usize, 1, 3]) {
        let doc = Document::load(path).unwrap();
        assert_eq!(doc.get_pages().len(), expected_pages);
    }
}
