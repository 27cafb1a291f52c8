//! BDD step definitions for the poll cycle feature

use std::sync::Arc;

use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;

use statuslight::config::{Config, Endpoint};
use statuslight::engine::Engine;
use statuslight::indicator::{new_indicator_handle, ChannelIntent, IndicatorPattern};
use statuslight::poller::EndpointPoller;
use statuslight::state::new_status_handle;
use statuslight::store::ConfigStore;

use crate::world::StatusLightWorld;

fn endpoint(host: &str) -> Endpoint {
    Endpoint {
        id: host.to_string(),
        name: host.to_string(),
        base_url: format!("http://{}", host),
        api_key: String::new(),
    }
}

fn parse_intent(s: &str) -> ChannelIntent {
    match s {
        "on" => ChannelIntent::On,
        "off" => ChannelIntent::Off,
        "blink" => ChannelIntent::Blink,
        other => panic!("Unknown intent: {}", other),
    }
}

/// Store shared between the scenario and the engine, created on first use
fn store(world: &mut StatusLightWorld) -> Arc<ConfigStore> {
    let endpoints = world.endpoints.clone();
    Arc::clone(world.store.get_or_insert_with(|| {
        Arc::new(ConfigStore::new(
            Config {
                endpoints,
                ..Config::default()
            },
            None,
        ))
    }))
}

#[given(expr = "an endpoint {string} that is unreachable")]
fn endpoint_unreachable(world: &mut StatusLightWorld, host: String) {
    world.kuma.bodies.lock().unwrap().insert(host.clone(), None);
    world.endpoints.push(endpoint(&host));
}

#[given(expr = "an endpoint {string} serving {string}")]
fn endpoint_serving(world: &mut StatusLightWorld, host: String, body: String) {
    world
        .kuma
        .bodies
        .lock()
        .unwrap()
        .insert(host.clone(), Some(body.replace("\\n", "\n")));
    world.endpoints.push(endpoint(&host));
}

#[given(expr = "the endpoint list is replaced by {string} during the first request")]
fn replaced_during_first_request(world: &mut StatusLightWorld, host: String) {
    world
        .kuma
        .bodies
        .lock()
        .unwrap()
        .insert(host.clone(), Some("monitor_status{x} 1\n".to_string()));
    let store = store(world);
    *world.kuma.replacement.lock().unwrap() = Some((store, vec![endpoint(&host)]));
}

#[given("the indicator currently shows all up")]
async fn indicator_all_up(world: &mut StatusLightWorld) {
    let indicator = new_indicator_handle();
    indicator.write().await.apply(IndicatorPattern {
        health: ChannelIntent::On,
        connectivity: ChannelIntent::Off,
    });
    world.indicator_before = Some(*indicator.read().await);
    world.indicator = Some(indicator);
}

#[when("a poll cycle runs")]
async fn run_poll_cycle(world: &mut StatusLightWorld) {
    let store = store(world);
    let indicator = world
        .indicator
        .get_or_insert_with(new_indicator_handle)
        .clone();
    let engine = Engine::new(
        store,
        EndpointPoller::new(world.kuma.clone()),
        indicator,
        new_status_handle(),
        CancellationToken::new(),
    );
    world.verdict = Some(engine.run_cycle().await);
}

#[then(expr = "the health indicator should be {string}")]
async fn health_should_be(world: &mut StatusLightWorld, expected: String) {
    let indicator = world.indicator.as_ref().expect("indicator not set");
    assert_eq!(indicator.read().await.health.intent(), parse_intent(&expected));
}

#[then(expr = "the connectivity indicator should be {string}")]
async fn connectivity_should_be(world: &mut StatusLightWorld, expected: String) {
    let indicator = world.indicator.as_ref().expect("indicator not set");
    assert_eq!(
        indicator.read().await.connectivity.intent(),
        parse_intent(&expected)
    );
}

#[then("the indicator should be unchanged")]
async fn indicator_unchanged(world: &mut StatusLightWorld) {
    let indicator = world.indicator.as_ref().expect("indicator not set");
    let before = world.indicator_before.expect("no earlier indicator state");
    assert_eq!(*indicator.read().await, before);
}

#[then(expr = "the polled endpoints should be {string}")]
fn polled_endpoints(world: &mut StatusLightWorld, expected: String) {
    let expected: Vec<String> = expected.split(',').map(str::to_string).collect();
    assert_eq!(world.kuma.requested_hosts(), expected);
}
