//! BDD step definitions for the verdict aggregation feature

use cucumber::{given, then, when};

use statuslight::poller::EndpointResult;
use statuslight::verdict::{aggregate, AggregateVerdict};

use crate::world::StatusLightWorld;

pub fn parse_verdict(s: &str) -> AggregateVerdict {
    match s {
        "AnyUnreachable" => AggregateVerdict::AnyUnreachable,
        "AnyDown" => AggregateVerdict::AnyDown,
        "AllUp" => AggregateVerdict::AllUp,
        "NoEndpointsConfigured" => AggregateVerdict::NoEndpointsConfigured,
        other => panic!("Unknown verdict: {}", other),
    }
}

#[given(expr = "an endpoint result that is reachable with {int} up and {int} down")]
fn reachable_result(world: &mut StatusLightWorld, up: u32, down: u32) {
    world.results.push(EndpointResult {
        reachable: true,
        credential_accepted: up + down > 0,
        up_count: up,
        down_count: down,
    });
}

#[given("an endpoint result that is unreachable")]
fn unreachable_result(world: &mut StatusLightWorld) {
    world.results.push(EndpointResult::unreachable());
}

#[when("the results are aggregated")]
fn aggregate_results(world: &mut StatusLightWorld) {
    world.verdict = Some(aggregate(&world.results));
}

#[then(expr = "the verdict should be {string}")]
fn verdict_should_be(world: &mut StatusLightWorld, expected: String) {
    let verdict = world.verdict.expect("no verdict");
    assert_eq!(verdict, parse_verdict(&expected));
}
