//! Shared fixtures: small PDFs built in memory with lopdf.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};
use std::fs;
use std::path::{Path, PathBuf};

/// An image to embed on a fixture page.
#[derive(Debug, Clone)]
pub enum FixtureImage {
    /// Stored as a `DCTDecode` stream; bytes are copied as-is.
    Jpeg(Vec<u8>),
    /// Unfiltered 8-bit RGB samples.
    Rgb { width: i64, height: i64, data: Vec<u8> },
    /// A hand-built image XObject, used as is.
    Stream(Stream),
}

/// One fixture page: its text and the images in its resource dictionary.
#[derive(Debug, Clone, Default)]
pub struct FixturePage {
    pub text: String,
    pub images: Vec<FixtureImage>,
    /// Paint the images with `Do`; when false they are only referenced.
    pub paint: bool,
    /// Also show this hex string with a Type0 `Identity-H` font that has
    /// no `/ToUnicode` map.
    pub cid_text: Option<String>,
}

impl FixturePage {
    pub fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_cid_text(mut self, hex: &str) -> Self {
        self.cid_text = Some(hex.to_string());
        self
    }

    pub fn with_image(mut self, image: FixtureImage) -> Self {
        self.images.push(image);
        self.paint = true;
        self
    }
}

/// Minimal JPEG-looking payload (SOI … EOI); never decoded by the tool.
pub fn fake_jpeg(tag: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', tag, 0xFF, 0xD9]
}

/// Build a PDF with the given pages.
pub fn pdf_with_pages(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "NotoSansCJK",
        "Encoding" => "Identity-H",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for page in pages {
        let mut xobjects = lopdf::Dictionary::new();
        let mut content = String::new();
        if let Some(ref hex) = page.cid_text {
            content.push_str(&format!("BT /F2 12 Tf 72 740 Td <{hex}> Tj ET\n"));
        }
        if !page.text.is_empty() {
            content.push_str(&format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET\n", page.text));
        }

        for (i, image) in page.images.iter().enumerate() {
            let name = format!("Im{}", i + 1);
            let stream = match image {
                FixtureImage::Jpeg(bytes) => Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => Object::Integer(1),
                        "Height" => Object::Integer(1),
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => Object::Integer(8),
                        "Filter" => "DCTDecode",
                    },
                    bytes.clone(),
                ),
                FixtureImage::Rgb {
                    width,
                    height,
                    data,
                } => Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => Object::Integer(*width),
                        "Height" => Object::Integer(*height),
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => Object::Integer(8),
                    },
                    data.clone(),
                ),
                FixtureImage::Stream(stream) => stream.clone(),
            };
            let image_id = doc.add_object(stream);
            xobjects.set(name.clone(), Object::Reference(image_id));
            if page.paint {
                content.push_str(&format!("q 100 0 0 100 72 500 cm /{name} Do Q\n"));
            }
        }

        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let mut fonts = dictionary! { "F1" => Object::Reference(font_id) };
        if page.cid_text.is_some() {
            fonts.set("F2", Object::Reference(cid_font_id));
        }
        let resources = dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(pages.len() as i64),
    });

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A DCT image stream whose JPEG bytes are additionally Flate-compressed.
pub fn flate_wrapped_jpeg(jpeg: &[u8]) -> Stream {
    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(1),
            "Height" => Object::Integer(1),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
        },
        jpeg.to_vec(),
    );
    stream.compress().unwrap();
    stream.dict.set(
        "Filter",
        vec![
            Object::Name(b"FlateDecode".to_vec()),
            Object::Name(b"DCTDecode".to_vec()),
        ],
    );
    stream
}

/// Write `bytes` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

/// Sorted file names inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// The three-page document with a single image on page 2.
pub fn three_pages_one_image() -> Vec<u8> {
    pdf_with_pages(&[
        FixturePage::text("First page"),
        FixturePage::text("Second page").with_image(FixtureImage::Jpeg(fake_jpeg(2))),
        FixturePage::text("Third page"),
    ])
}
