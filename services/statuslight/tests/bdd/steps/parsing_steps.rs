//! BDD step definitions for the metrics parsing feature

use cucumber::{given, then, when};

use statuslight::metrics::parse;

use crate::world::StatusLightWorld;

#[given(expr = "a metrics payload {string}")]
fn metrics_payload(world: &mut StatusLightWorld, payload: String) {
    world.payload = Some(payload.replace("\\n", "\n"));
}

#[given("an empty metrics payload")]
fn empty_payload(world: &mut StatusLightWorld) {
    world.payload = Some(String::new());
}

#[when("the payload is parsed")]
fn parse_payload(world: &mut StatusLightWorld) {
    let payload = world.payload.as_deref().expect("payload not set");
    world.counts = Some(parse(payload));
}

#[then(expr = "the up count should be {int}")]
fn up_count_should_be(world: &mut StatusLightWorld, expected: u32) {
    let counts = world.counts.expect("payload not parsed");
    assert_eq!(counts.up, expected);
}

#[then(expr = "the down count should be {int}")]
fn down_count_should_be(world: &mut StatusLightWorld, expected: u32) {
    let counts = world.counts.expect("payload not parsed");
    assert_eq!(counts.down, expected);
}
