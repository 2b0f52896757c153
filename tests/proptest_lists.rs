//! Property-based tests for list decoding, schema order and winding.
//!
//! Run with: cargo test --test proptest_lists

use ply_mesh::mesh::{check_winding, MeshError};
use ply_mesh::ser::to_bytes;
use ply_mesh::{
    Document, Element, ElementDef, PlyFormat, PlyHeader, PropertyDef, PropertyValue, Record,
    ScalarType,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_format() -> impl Strategy<Value = PlyFormat> {
    prop_oneof![
        Just(PlyFormat::Ascii),
        Just(PlyFormat::BinaryLittleEndian),
        Just(PlyFormat::BinaryBigEndian),
    ]
}

fn arb_scalar_type() -> impl Strategy<Value = ScalarType> {
    prop_oneof![
        Just(ScalarType::I8),
        Just(ScalarType::U8),
        Just(ScalarType::I16),
        Just(ScalarType::U16),
        Just(ScalarType::I32),
        Just(ScalarType::U32),
        Just(ScalarType::F32),
        Just(ScalarType::F64),
    ]
}

/// A triangulated `width` x `height` grid with every face wound the same way.
fn grid_faces(width: u32, height: u32) -> (usize, Vec<[u32; 3]>) {
    let v = |i: u32, j: u32| j * (width + 1) + i;
    let mut faces = Vec::new();
    for j in 0..height {
        for i in 0..width {
            let (a, b, c, d) = (v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1));
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    (((width + 1) * (height + 1)) as usize, faces)
}

fn mesh_document(vertex_count: usize, faces: &[[u32; 3]]) -> Document {
    let vertex_def = ElementDef::new("vertex", vertex_count)
        .with_property(PropertyDef::scalar("x", ScalarType::F32));
    let vertices = (0..vertex_count)
        .map(|i| Record::new(vec![(i as f32).into()]))
        .collect();

    let face_def = ElementDef::new("face", faces.len()).with_property(PropertyDef::list(
        "vertex_indices",
        ScalarType::U8,
        ScalarType::U32,
    ));
    let face_records = faces
        .iter()
        .map(|f| Record::new(vec![f.to_vec().into()]))
        .collect();

    let mut doc = Document::new(PlyFormat::BinaryLittleEndian);
    doc.add_element(Element::new(vertex_def, vertices).unwrap());
    doc.add_element(Element::new(face_def, face_records).unwrap());
    doc
}

// =============================================================================
// Decoding
// =============================================================================

proptest! {
    #[test]
    fn proptest_list_lengths_survive(
        format in arb_format(),
        lists in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..40), 1..20),
    ) {
        let def = ElementDef::new("face", lists.len())
            .with_property(PropertyDef::list("vertex_indices", ScalarType::U8, ScalarType::U16))
            .with_property(PropertyDef::scalar("tag", ScalarType::I8));
        let records = lists
            .iter()
            .map(|l| Record::new(vec![l.clone().into(), (-1i8).into()]))
            .collect();

        let mut doc = Document::new(format);
        doc.add_element(Element::new(def, records).unwrap());

        let decoded = Document::from_bytes(&to_bytes(&doc).unwrap()).unwrap();
        let face = decoded.element("face").unwrap();
        prop_assert_eq!(face.len(), lists.len());
        for (i, list) in lists.iter().enumerate() {
            let expected = PropertyValue::from(list.clone());
            prop_assert_eq!(face.get(i, "vertex_indices"), Some(&expected));
            prop_assert_eq!(face.get(i, "tag"), Some(&PropertyValue::from(-1i8)));
        }
    }

    #[test]
    fn proptest_floats_survive(
        format in arb_format(),
        values in prop::collection::vec(-1.0e6f32..1.0e6, 0..50),
    ) {
        let def = ElementDef::new("sample", values.len())
            .with_property(PropertyDef::scalar("value", ScalarType::F32));
        let records = values.iter().map(|&v| Record::new(vec![v.into()])).collect();

        let mut doc = Document::new(format);
        doc.add_element(Element::new(def, records).unwrap());

        let decoded = Document::from_bytes(&to_bytes(&doc).unwrap()).unwrap();
        prop_assert_eq!(decoded.elements(), doc.elements());
    }

    #[test]
    fn proptest_declaration_order_preserved(
        types in prop::collection::vec((any::<bool>(), arb_scalar_type()), 1..12),
    ) {
        let mut def = ElementDef::new("thing", 0);
        for (i, &(is_list, ty)) in types.iter().enumerate() {
            let name = format!("p{i}");
            def = def.with_property(if is_list {
                PropertyDef::list(name, ScalarType::U8, ty)
            } else {
                PropertyDef::scalar(name, ty)
            });
        }
        let text = format!("ply\nformat ascii 1.0\n{def}\nend_header\n");

        let header = PlyHeader::parse(&mut text.as_bytes()).unwrap();
        prop_assert_eq!(header.elements, vec![def]);
    }
}

// =============================================================================
// Winding
// =============================================================================

proptest! {
    #[test]
    fn proptest_grid_consistent_from_any_seed(
        (width, height, seed) in (1u32..6, 1u32..6).prop_flat_map(|(w, h)| {
            (Just(w), Just(h), 0..(2 * w * h) as usize)
        }),
    ) {
        let (vertex_count, faces) = grid_faces(width, height);
        let doc = mesh_document(vertex_count, &faces);

        let report = check_winding(&doc, seed).unwrap();
        prop_assert_eq!(report.visited.len(), faces.len());
        prop_assert_eq!(report.visited[0], seed);
        prop_assert!(report.is_consistent());
    }

    #[test]
    fn proptest_single_flip_detected(
        (width, height, seed, flip) in (1u32..6, 1u32..6).prop_flat_map(|(w, h)| {
            let n = (2 * w * h) as usize;
            (Just(w), Just(h), 0..n, 0..n)
        }),
    ) {
        let (vertex_count, mut faces) = grid_faces(width, height);
        let [a, b, c] = faces[flip];
        faces[flip] = [a, c, b];
        let doc = mesh_document(vertex_count, &faces);

        let result = check_winding(&doc, seed);
        prop_assert!(
            matches!(result, Err(MeshError::BadFace { .. })),
            "flip of face {} not detected from seed {}",
            flip,
            seed
        );
    }
}
