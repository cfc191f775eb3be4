//! Embedded image inventory and extraction.
//!
//! The inventory is resource-based, not paint-based: every image XObject
//! reachable from a page's `/Resources` is listed, whether or not the
//! content stream ever draws it. Resources inherited from ancestor page-tree
//! nodes count, and so do images nested inside Form XObjects. Each object
//! appears once per page.
//!
//! Extraction returns the image in its native container when the stream
//! already is one (JPEG, JPEG 2000, JBIG2), after undoing any general-purpose
//! filters wrapped around it. Streams holding bare samples are decoded and
//! re-encoded as PNG through [`super::encode`].
//!
//! Reference policy: a reference along the resource chain (`/Resources`,
//! `/XObject`, an XObject entry, a Form's `/Resources`) that points at a
//! missing object is malformed data and fails the page. Entries of the wrong
//! type are ignored. Colour-space and `/Decode` details that cannot be
//! resolved only downgrade the image to [`ImageFormat::Unknown`].

use super::encode::{self, ColorModel, PixelLayout};
use crate::output::ImageFormat;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Page-tree nodes deeper than this are treated as a cycle.
const MAX_INHERIT_DEPTH: usize = 64;

/// Raw bytes of one image and the format they are in.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

/// List the image XObjects referenced from a page's resource set, in
/// resource-dictionary order, without duplicates.
pub fn page_image_refs(document: &Document, page_id: ObjectId) -> Result<Vec<ObjectId>, lopdf::Error> {
    let mut images = Vec::new();
    let mut visited_forms = HashSet::new();

    if let Some(resources) = page_resources(document, page_id)? {
        collect_images(document, resources, &mut images, &mut visited_forms)?;
    }

    Ok(images)
}

/// The page's own `/Resources`, or the nearest ancestor's.
fn page_resources(document: &Document, page_id: ObjectId) -> Result<Option<&Dictionary>, lopdf::Error> {
    let mut node = document.get_dictionary(page_id)?;

    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(res) = node.get(b"Resources") {
            return Ok(match deref(document, res)? {
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            });
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => node = document.get_dictionary(*parent)?,
            _ => return Ok(None),
        }
    }

    warn!("Page {:?}: /Parent chain too deep, ignoring inherited resources", page_id);
    Ok(None)
}

fn collect_images(
    document: &Document,
    resources: &Dictionary,
    images: &mut Vec<ObjectId>,
    visited_forms: &mut HashSet<ObjectId>,
) -> Result<(), lopdf::Error> {
    let xobjects = match resources.get(b"XObject") {
        Ok(obj) => match deref(document, obj)? {
            Object::Dictionary(d) => d,
            _ => return Ok(()),
        },
        Err(_) => return Ok(()),
    };

    for (name, entry) in xobjects.iter() {
        let id = match entry {
            Object::Reference(id) => *id,
            // A direct stream has no object number to extract by.
            _ => continue,
        };
        let stream = match document.get_object(id)? {
            Object::Stream(stream) => stream,
            _ => continue,
        };

        match name_of(stream.dict.get(b"Subtype").ok()) {
            Some(b"Image") => {
                if !images.contains(&id) {
                    debug!(
                        "Image XObject /{} → {:?}",
                        String::from_utf8_lossy(name),
                        id
                    );
                    images.push(id);
                }
            }
            Some(b"Form") => {
                if visited_forms.insert(id) {
                    if let Ok(res) = stream.dict.get(b"Resources") {
                        if let Object::Dictionary(form_res) = deref(document, res)? {
                            collect_images(document, form_res, images, visited_forms)?;
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Resolve an image object to bytes in its native format.
///
/// Only a missing or non-stream object is an error; anything that merely
/// cannot be decoded comes back as [`ImageFormat::Unknown`].
pub fn extract_image(document: &Document, id: ObjectId) -> Result<ExtractedImage, lopdf::Error> {
    let stream = document.get_object(id)?.as_stream()?;
    let filters = stream_filters(document, &stream.dict);

    if let Some((last, outer)) = filters.split_last() {
        if let Some(format) = native_format(last) {
            return Ok(match strip_outer_filters(stream, outer) {
                Ok(data) => ExtractedImage { format, data },
                Err(e) => {
                    warn!("Image {:?}: cannot undo outer filters ({}), writing stream bytes", id, e);
                    ExtractedImage {
                        format: ImageFormat::Unknown,
                        data: stream.content.clone(),
                    }
                }
            });
        }
    }

    let samples = match stream_bytes(stream, &filters) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Image {:?}: cannot decode stream ({}), writing stream bytes", id, e);
            return Ok(ExtractedImage {
                format: ImageFormat::Unknown,
                data: stream.content.clone(),
            });
        }
    };

    let png = pixel_layout(document, &stream.dict)
        .map_err(|reason| reason.to_string())
        .and_then(|layout| encode::encode_png(&layout, &samples).map_err(|e| e.to_string()));

    match png {
        Ok(data) => Ok(ExtractedImage {
            format: ImageFormat::Png,
            data,
        }),
        Err(reason) => {
            warn!("Image {:?}: cannot build PNG ({}), writing decoded bytes", id, reason);
            Ok(ExtractedImage {
                format: ImageFormat::Unknown,
                data: samples,
            })
        }
    }
}

/// Container format for a filter whose output is already an image file.
fn native_format(filter: &[u8]) -> Option<ImageFormat> {
    match filter {
        b"DCTDecode" | b"DCT" => Some(ImageFormat::Jpeg),
        b"JPXDecode" => Some(ImageFormat::Jpx),
        b"JBIG2Decode" => Some(ImageFormat::Jbig2),
        _ => None,
    }
}

/// Undo the general-purpose filters (`outer`, in decoding order) wrapped
/// around a native image stream.
fn strip_outer_filters(stream: &Stream, outer: &[Vec<u8>]) -> Result<Vec<u8>, lopdf::Error> {
    if outer.is_empty() {
        return Ok(stream.content.clone());
    }

    let mut dict = stream.dict.clone();
    dict.set(
        "Filter",
        Object::Array(outer.iter().cloned().map(Object::Name).collect()),
    );
    // Per-filter parameters come as an array; lopdf applies a single dict.
    if let Ok(Object::Array(parms)) = stream.dict.get(b"DecodeParms") {
        match parms.first() {
            Some(Object::Dictionary(first)) => dict.set("DecodeParms", first.clone()),
            _ => {
                dict.remove(b"DecodeParms");
            }
        }
    }

    Stream::new(dict, stream.content.clone()).decompressed_content()
}

/// Filter names applied to a stream, outermost first.
fn stream_filters(document: &Document, dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter").map(|f| resolve(document, f)) {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|o| match resolve(document, o) {
                Object::Name(n) => Some(n.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn stream_bytes(stream: &Stream, filters: &[Vec<u8>]) -> Result<Vec<u8>, lopdf::Error> {
    if filters.is_empty() {
        Ok(stream.content.clone())
    } else {
        stream.decompressed_content()
    }
}

/// Read width, height, depth and colour model from an image dictionary.
fn pixel_layout(document: &Document, dict: &Dictionary) -> Result<PixelLayout, &'static str> {
    let width = int_entry(document, dict, b"Width").ok_or("missing /Width")?;
    let height = int_entry(document, dict, b"Height").ok_or("missing /Height")?;
    if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
        return Err("invalid dimensions");
    }

    let is_mask = matches!(
        dict.get(b"ImageMask").map(|o| resolve(document, o)),
        Ok(Object::Boolean(true))
    );

    let (bits, color) = if is_mask {
        (1, ColorModel::Gray)
    } else {
        let bits = int_entry(document, dict, b"BitsPerComponent").unwrap_or(8);
        let cs = dict.get(b"ColorSpace").map_err(|_| "missing /ColorSpace")?;
        (bits, color_model(document, cs, true)?)
    };

    Ok(PixelLayout {
        width: width as u32,
        height: height as u32,
        bits_per_component: u8::try_from(bits).map_err(|_| "invalid /BitsPerComponent")?,
        invert: decode_inverted(document, dict),
        color,
    })
}

fn color_model(document: &Document, cs: &Object, allow_indexed: bool) -> Result<ColorModel, &'static str> {
    match resolve(document, cs) {
        Object::Name(name) => device_model(name).ok_or("unsupported colour space"),
        Object::Array(items) => {
            let family = match items.first().map(|o| resolve(document, o)) {
                Some(Object::Name(n)) => n.as_slice(),
                _ => return Err("malformed colour space"),
            };
            match family {
                b"ICCBased" => {
                    let n = items
                        .get(1)
                        .map(|o| resolve(document, o))
                        .and_then(|o| o.as_stream().ok())
                        .and_then(|s| int_entry(document, &s.dict, b"N"));
                    match n {
                        Some(1) => Ok(ColorModel::Gray),
                        Some(3) => Ok(ColorModel::Rgb),
                        Some(4) => Ok(ColorModel::Cmyk),
                        _ => Err("unsupported ICC component count"),
                    }
                }
                b"CalGray" => Ok(ColorModel::Gray),
                b"CalRGB" => Ok(ColorModel::Rgb),
                b"Indexed" | b"I" if allow_indexed => {
                    let base = items.get(1).ok_or("indexed colour space without base")?;
                    let base = color_model(document, base, false)?;
                    let lookup = items
                        .get(3)
                        .map(|o| palette_bytes(document, o))
                        .ok_or("indexed colour space without lookup")??;
                    Ok(ColorModel::Indexed {
                        base: Box::new(base),
                        lookup,
                    })
                }
                other => device_model(other).ok_or("unsupported colour space"),
            }
        }
        _ => Err("malformed colour space"),
    }
}

fn device_model(name: &[u8]) -> Option<ColorModel> {
    match name {
        b"DeviceGray" | b"G" | b"CalGray" => Some(ColorModel::Gray),
        b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(ColorModel::Rgb),
        b"DeviceCMYK" | b"CMYK" => Some(ColorModel::Cmyk),
        _ => None,
    }
}

fn palette_bytes(document: &Document, obj: &Object) -> Result<Vec<u8>, &'static str> {
    match resolve(document, obj) {
        Object::String(bytes, _) => Ok(bytes.clone()),
        Object::Stream(stream) => {
            let filters = stream_filters(document, &stream.dict);
            stream_bytes(stream, &filters).map_err(|_| "undecodable palette stream")
        }
        _ => Err("malformed palette"),
    }
}

/// `Decode [1 0 …]` on the first component.
fn decode_inverted(document: &Document, dict: &Dictionary) -> bool {
    match dict.get(b"Decode").map(|o| resolve(document, o)) {
        Ok(Object::Array(items)) if items.len() >= 2 => {
            number(resolve(document, &items[0])) == Some(1.0)
                && number(resolve(document, &items[1])) == Some(0.0)
        }
        _ => false,
    }
}

/// Follow references that must exist.
fn deref<'a>(document: &'a Document, obj: &'a Object) -> Result<&'a Object, lopdf::Error> {
    document.dereference(obj).map(|(_, target)| target)
}

/// Follow a reference if it resolves, otherwise keep the object as is.
fn resolve<'a>(document: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => document.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn name_of(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::Name(n)) => Some(n.as_slice()),
        _ => None,
    }
}

fn int_entry(document: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match dict.get(key).map(|o| resolve(document, o)) {
        Ok(Object::Integer(i)) => Some(*i),
        Ok(Object::Real(r)) => Some(*r as i64),
        _ => None,
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
