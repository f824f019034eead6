//! End-to-end coupling cycles between two applications sharing one
//! in-process transport.

use std::sync::Arc;

use tandem_adapters::{copy_values, TagFieldAdapter};
use tandem_core::{
    plane_field_name, Coord, EvaluationMethod, PhaseEpoch, TransferMethod, TransferOptions,
};
use tandem_test_utils::{scenario_mask, scenario_server, SCENARIO_ENTITIES, SCENARIO_OVERLAP};

/// Register `name` on `application` as a tag field with the given
/// initial values and verbatim transfer in both directions.
fn add_copy_field(
    application: &mut tandem_server::Application,
    name: &str,
    values: Vec<f64>,
    overlap: Arc<tandem_core::OverlapMask>,
) {
    application
        .add_field(
            name,
            Box::new(TagFieldAdapter::with_index_coords(name, values)),
            TransferOptions::COPY,
            TransferOptions::COPY,
            overlap,
        )
        .unwrap();
}

#[test]
fn core_to_edge_single_field_roundtrip() {
    let (mut server, _transport) = scenario_server();
    let overlap = scenario_mask();
    let field_name = plane_field_name("pot0", 0);
    assert_eq!(field_name, "pot0_plane_0");

    let core_values: Vec<f64> = (0..SCENARIO_ENTITIES).map(|i| i as f64 * 2.0).collect();
    let core = server.add_application("core", "core/").unwrap();
    add_copy_field(core, &field_name, core_values, Arc::clone(&overlap));

    let edge = server.add_application("edge", "edge/").unwrap();
    add_copy_field(
        edge,
        &field_name,
        vec![0.0; SCENARIO_ENTITIES],
        Arc::clone(&overlap),
    );

    let core = server.application_mut("core").unwrap();
    core.begin_send_phase().unwrap();
    core.send(&field_name).unwrap();
    core.end_send_phase().unwrap();

    let edge = server.application_mut("edge").unwrap();
    edge.begin_receive_phase().unwrap();
    edge.receive(&field_name).unwrap();
    edge.end_receive_phase().unwrap();

    let field = edge.field(&field_name).unwrap();
    assert_eq!(field.last_received_epoch(), Some(PhaseEpoch::FIRST));
    let tag = field.adapter_as::<TagFieldAdapter>().unwrap();
    for i in 0..SCENARIO_OVERLAP {
        assert_eq!(tag.values()[i], i as f64 * 2.0, "overlap entity {i}");
    }
    for i in SCENARIO_OVERLAP..SCENARIO_ENTITIES {
        assert_eq!(tag.values()[i], 0.0, "non-overlap entity {i}");
    }
}

#[test]
fn repeated_receive_is_idempotent() {
    let (mut server, _transport) = scenario_server();
    let overlap = scenario_mask();

    let core = server.add_application("core", "core/").unwrap();
    add_copy_field(core, "density", vec![3.0; SCENARIO_ENTITIES], Arc::clone(&overlap));
    let edge = server.add_application("edge", "edge/").unwrap();
    add_copy_field(edge, "density", vec![0.0; SCENARIO_ENTITIES], Arc::clone(&overlap));

    let core = server.application_mut("core").unwrap();
    core.begin_send_phase().unwrap();
    core.send("density").unwrap();
    core.end_send_phase().unwrap();

    let edge = server.application_mut("edge").unwrap();
    edge.begin_receive_phase().unwrap();
    edge.receive("density").unwrap();
    let first: Vec<f64> = edge
        .field("density")
        .unwrap()
        .adapter_as::<TagFieldAdapter>()
        .unwrap()
        .values()
        .to_vec();
    // A second receive with no new peer send redelivers the same data.
    edge.receive("density").unwrap();
    edge.end_receive_phase().unwrap();
    let second = edge
        .field("density")
        .unwrap()
        .adapter_as::<TagFieldAdapter>()
        .unwrap()
        .values();
    assert_eq!(first, second);
}

#[test]
fn send_all_and_receive_all_follow_registration_order() {
    let (mut server, _transport) = scenario_server();
    let overlap = scenario_mask();

    let core = server.add_application("core", "core/").unwrap();
    for plane in 0..2 {
        let name = plane_field_name("pot0", plane);
        let values: Vec<f64> = (0..SCENARIO_ENTITIES)
            .map(|i| (plane as f64 + 1.0) * i as f64)
            .collect();
        add_copy_field(core, &name, values, Arc::clone(&overlap));
    }
    let edge = server.add_application("edge", "edge/").unwrap();
    for plane in 0..2 {
        let name = plane_field_name("pot0", plane);
        add_copy_field(edge, &name, vec![0.0; SCENARIO_ENTITIES], Arc::clone(&overlap));
    }

    let core = server.application_mut("core").unwrap();
    core.begin_send_phase().unwrap();
    core.send_all().unwrap();
    core.end_send_phase().unwrap();

    let edge = server.application_mut("edge").unwrap();
    edge.begin_receive_phase().unwrap();
    edge.receive_all().unwrap();
    edge.end_receive_phase().unwrap();

    for plane in 0..2 {
        let name = plane_field_name("pot0", plane);
        let tag = edge
            .field(&name)
            .unwrap()
            .adapter_as::<TagFieldAdapter>()
            .unwrap();
        assert_eq!(tag.values()[10], (plane as f64 + 1.0) * 10.0);
    }
}

#[test]
fn received_field_seeds_outgoing_field_via_copy_values() {
    let (mut server, _transport) = scenario_server();
    let overlap = scenario_mask();

    let core = server.add_application("core", "core/").unwrap();
    add_copy_field(
        core,
        "pot0_plane_0",
        (0..SCENARIO_ENTITIES).map(|i| i as f64).collect(),
        Arc::clone(&overlap),
    );
    let edge = server.add_application("edge", "edge/").unwrap();
    add_copy_field(edge, "pot0_plane_0", vec![0.0; SCENARIO_ENTITIES], Arc::clone(&overlap));
    add_copy_field(edge, "potm0_plane_0", vec![0.0; SCENARIO_ENTITIES], Arc::clone(&overlap));

    let core = server.application_mut("core").unwrap();
    core.begin_send_phase().unwrap();
    core.send("pot0_plane_0").unwrap();
    core.end_send_phase().unwrap();

    let edge = server.application_mut("edge").unwrap();
    edge.begin_receive_phase().unwrap();
    edge.receive("pot0_plane_0").unwrap();
    edge.end_receive_phase().unwrap();

    // Between phases: copy the received field into the outgoing one.
    let received = edge
        .field("pot0_plane_0")
        .unwrap()
        .adapter_as::<TagFieldAdapter>()
        .unwrap()
        .clone();
    let outgoing = edge
        .field_mut("potm0_plane_0")
        .unwrap()
        .adapter_as_mut::<TagFieldAdapter>()
        .unwrap();
    copy_values(&received, outgoing).unwrap();

    edge.begin_send_phase().unwrap();
    edge.send("potm0_plane_0").unwrap();
    edge.end_send_phase().unwrap();

    // Core reads the seeded field back under the new name.
    let core = server.application_mut("core").unwrap();
    core.add_field(
        "potm0_plane_0",
        Box::new(TagFieldAdapter::with_index_coords(
            "potm0_plane_0",
            vec![0.0; SCENARIO_ENTITIES],
        )),
        TransferOptions::COPY,
        TransferOptions::COPY,
        Arc::clone(&overlap),
    )
    .unwrap();
    core.begin_receive_phase().unwrap();
    core.receive("potm0_plane_0").unwrap();
    core.end_receive_phase().unwrap();

    let tag = core
        .field("potm0_plane_0")
        .unwrap()
        .adapter_as::<TagFieldAdapter>()
        .unwrap();
    assert_eq!(tag.values()[7], 7.0);
}

#[test]
fn interpolating_exchange_between_offset_geometries() {
    let (mut server, _transport) = scenario_server();
    let overlap = scenario_mask();
    let interpolate = TransferOptions::new(
        TransferMethod::Interpolate,
        EvaluationMethod::Lagrange { degree: 1 },
    );

    // Sender's native coordinates coincide with the partition's, so the
    // outgoing evaluation reproduces the native values exactly.
    let core = server.add_application("core", "core/").unwrap();
    let core_values: Vec<f64> = (0..SCENARIO_ENTITIES).map(|i| i as f64 * 10.0).collect();
    core.add_field(
        "pot0",
        Box::new(TagFieldAdapter::with_index_coords("pot0", core_values)),
        TransferOptions::COPY,
        interpolate,
        Arc::clone(&overlap),
    )
    .unwrap();

    // Receiver's native entities sit halfway between partition points.
    let edge = server.add_application("edge", "edge/").unwrap();
    let edge_coords: Vec<Coord> = (0..SCENARIO_ENTITIES)
        .map(|i| Coord::from_slice(&[i as f64 + 0.5]))
        .collect();
    let adapter =
        TagFieldAdapter::new("pot0", vec![0.0; SCENARIO_ENTITIES], edge_coords).unwrap();
    edge.add_field("pot0", Box::new(adapter), interpolate, TransferOptions::COPY, overlap)
        .unwrap();

    let core = server.application_mut("core").unwrap();
    core.begin_send_phase().unwrap();
    core.send("pot0").unwrap();
    core.end_send_phase().unwrap();

    let edge = server.application_mut("edge").unwrap();
    edge.begin_receive_phase().unwrap();
    edge.receive("pot0").unwrap();
    edge.end_receive_phase().unwrap();

    let tag = edge.field("pot0").unwrap().adapter_as::<TagFieldAdapter>().unwrap();
    // Interior overlap entities land on the average of their canonical
    // neighbors; the last marked entity extrapolates, skip it.
    for i in 0..SCENARIO_OVERLAP - 1 {
        let expected = 10.0 * i as f64 + 5.0;
        assert!(
            (tag.values()[i] - expected).abs() < 1e-9,
            "entity {i}: {} vs {expected}",
            tag.values()[i]
        );
    }
    // Entities outside the overlap never change.
    assert_eq!(tag.values()[SCENARIO_OVERLAP], 0.0);
}
