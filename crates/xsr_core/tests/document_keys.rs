use xsr_core::{
    assembly_document_key, assembly_id_from_route, compact_document_key, document_file_name,
    part_document_key, route_id,
};

#[test]
fn trailing_standard_segment_is_removed() {
    assert_eq!(document_file_name("BEAM-12 - STANDARD.pdf"), "BEAM-12.pdf");
    assert_eq!(document_file_name("BEAM-12 - BRACE.pdf"), "BEAM-12.pdf");
}

#[test]
fn compact_key_drops_underscores_slashes_and_spaces() {
    assert_eq!(compact_document_key("PLATE_07.pdf"), "PLATE07.pdf");
    assert_eq!(compact_document_key("K 3/A_1 - STANDARD.pdf"), "K3A1.pdf");
}

#[test]
fn part_key_keeps_underscores() {
    assert_eq!(part_document_key("p102"), "p102.pdf");
    assert_eq!(part_document_key("pl 7/A_2"), "pl7A_2.pdf");
}

#[test]
fn assembly_key_flattens_the_identifier() {
    assert_eq!(assembly_document_key("B/12"), "B12.pdf");
    assert_eq!(assembly_document_key("K_2 - 3/4"), "K234.pdf");
}

#[test]
fn route_ids_swap_slashes_for_dashes() {
    assert_eq!(route_id("B/12"), "B-12");
    assert_eq!(assembly_id_from_route("B-12"), "B/12");
    assert_eq!(assembly_id_from_route(&route_id("KOLON/7")), "KOLON/7");
}
