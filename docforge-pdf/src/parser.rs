use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfError, Result};
use crate::model::{ExtractedDocument, ExtractedImage};

/// Extracts per-page text (delimited with `--- PAGE n ---`) and every raster
/// image referenced from a page's `/Resources/XObject` dictionary.
///
/// Per-page text extraction failures never abort the whole document: the
/// offending page's text becomes an empty string and a warning is logged.
pub fn extract(bytes: &[u8]) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
    extract_from_document(&doc)
}

fn extract_from_document(doc: &Document) -> Result<ExtractedDocument> {
    let page_map = doc.get_pages();
    let mut page_ids: Vec<(u32, ObjectId)> = page_map
        .into_iter()
        .map(|(page_number, object_id)| (page_number, object_id))
        .collect();
    page_ids.sort_unstable_by_key(|(page_number, _)| *page_number);

    let mut text = String::new();
    let mut images = Vec::new();

    for (page_index, (page_number, object_id)) in page_ids.iter().enumerate() {
        let page_text = doc.extract_text(&[*page_number]).unwrap_or_else(|e| {
            tracing::warn!(page = page_index + 1, error = %e, "failed to extract text for page, continuing with empty text");
            String::new()
        });

        text.push_str(&format!("--- PAGE {} ---\n", page_index + 1));
        text.push_str(&page_text);
        if !page_text.ends_with('\n') {
            text.push('\n');
        }

        match extract_page_images(doc, *object_id, page_index + 1) {
            Ok(page_images) => images.extend(page_images),
            Err(e) => {
                tracing::warn!(page = page_index + 1, error = %e, "failed to extract images for page, continuing");
            }
        }
    }

    Ok(ExtractedDocument {
        text,
        pages: page_ids.len(),
        images,
    })
}

fn resolve_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    let mut current = Some(page_id);
    while let Some(id) = current {
        let dict = doc.get_dictionary(id).ok()?;
        if let Ok(resources_ref) = dict.get(b"Resources") {
            return resolve_dict(doc, resources_ref);
        }
        current = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok());
    }
    None
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Dictionary(d) => Some(d),
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        _ => None,
    }
}

fn extract_page_images(doc: &Document, page_id: ObjectId, page_number: usize) -> Result<Vec<ExtractedImage>> {
    let Some(resources) = resolve_resources(doc, page_id) else {
        return Ok(Vec::new());
    };
    let Ok(xobjects_ref) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let Some(xobjects) = resolve_dict(doc, xobjects_ref) else {
        return Ok(Vec::new());
    };

    let mut images = Vec::new();
    let mut index = 0usize;

    for (_name, xobject_ref) in xobjects.iter() {
        let Ok(object_id) = xobject_ref.as_reference() else {
            continue;
        };
        let Ok(object) = doc.get_object(object_id) else {
            continue;
        };
        let Ok(stream) = object.as_stream() else {
            continue;
        };
        let dict = &stream.dict;
        let is_image = dict
            .get(b"Subtype")
            .and_then(Object::as_name_str)
            .map(|s| s == "Image")
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let width = dict.get(b"Width").and_then(Object::as_i64).unwrap_or(0).max(0) as u32;
        let height = dict.get(b"Height").and_then(Object::as_i64).unwrap_or(0).max(0) as u32;
        let colorspace = colorspace_name(dict);

        let content = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        images.push(ExtractedImage {
            page: page_number,
            index,
            bytes: content,
            width,
            height,
            colorspace,
        });
        index += 1;
    }

    Ok(images)
}

fn colorspace_name(dict: &Dictionary) -> String {
    match dict.get(b"ColorSpace") {
        Ok(Object::Name(name)) => match name.as_slice() {
            b"DeviceGray" => "DeviceGray".to_string(),
            b"DeviceRGB" => "DeviceRGB".to_string(),
            b"DeviceCMYK" => "DeviceCMYK".to_string(),
            other => String::from_utf8_lossy(other).to_string(),
        },
        Ok(Object::Array(_)) | Ok(Object::Reference(_)) => "indexed".to_string(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_bytes_fail_to_parse() {
        let result = extract(b"not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn colorspace_name_maps_known_devices() {
        let mut dict = Dictionary::new();
        dict.set("ColorSpace", Object::Name(b"DeviceCMYK".to_vec()));
        assert_eq!(colorspace_name(&dict), "DeviceCMYK");
    }

    #[test]
    fn colorspace_name_defaults_to_unknown() {
        let dict = Dictionary::new();
        assert_eq!(colorspace_name(&dict), "unknown");
    }
}
