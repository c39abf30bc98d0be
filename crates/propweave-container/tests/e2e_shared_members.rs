//! E2E integration test: several members contained in one container share
//! fields through it.
//!
//! Validates:
//! 1. Member factories read container fields before their own fields exist.
//! 2. Linked fields alias one slot across every member and the container.
//! 3. Unlinked member fields stay private to the member.
//! 4. Free-function redirects and container links compose on one graph.
//! 5. Errors leave earlier links in place.
//!
//! Scenario: a "party" container holds a shared gold purse and a turn
//! counter. Heroes are contained with their own names and link `gold`; a
//! separate scoreboard object is redirected onto the container afterwards.

#![forbid(unsafe_code)]

use propweave_container::{BoxError, ContainRequest, Container, ContainerConfig, ContainerError};
use propweave_core::{Object, RedirectOptions, SeedPolicy, Value, redirect};

// ── Factories ───────────────────────────────────────────────────────────

struct HeroParams {
    name: &'static str,
    gold: i64,
}

fn hero(this: &Object, params: HeroParams) -> Result<(), BoxError> {
    // Turn comes from the container: the hero joins on the current turn.
    let joined = this.get("turn");
    this.set("name", params.name)?;
    this.set("gold", params.gold)?;
    this.set("joined_turn", joined)?;
    Ok(())
}

fn party() -> Container {
    Container::new([("turn", Value::from(0)), ("title", Value::from("party"))])
}

// ── Scenario ────────────────────────────────────────────────────────────

#[test]
fn heroes_share_gold_through_the_party() {
    let mut party = party();

    let ann = party
        .contain_class(
            ContainRequest::new("ann", hero, HeroParams { name: "Ann", gold: 30 })
                .with_link_props(["gold"]),
        )
        .unwrap();

    party.set("turn", 1).unwrap();

    let bo = party
        .contain_class(
            ContainRequest::new("bo", hero, HeroParams { name: "Bo", gold: 5 })
                .with_link_props(["gold"]),
        )
        .unwrap();

    // Factories saw the container's turn counter at construction time.
    assert_eq!(ann.get("joined_turn"), Value::Int(0));
    assert_eq!(bo.get("joined_turn"), Value::Int(1));

    // Ann seeded the purse; Bo's own 5 was discarded.
    assert_eq!(party.get("gold"), Value::Int(30));
    assert_eq!(bo.get("gold"), Value::Int(30));

    // Spending through either hero drains the same purse.
    bo.set("gold", 25).unwrap();
    assert_eq!(ann.get("gold"), Value::Int(25));
    assert_eq!(party.get("gold"), Value::Int(25));

    // Names stay private.
    assert_eq!(ann.get("name"), Value::from("Ann"));
    assert_eq!(bo.get("name"), Value::from("Bo"));
    assert!(party.get("name").is_undefined());

    // Unlinked names still fall back to the container.
    assert_eq!(bo.get("title"), Value::from("party"));
    party.set_fields([("title", "guild")]).unwrap();
    assert_eq!(ann.get("title"), Value::from("guild"));

    assert_eq!(party.member_keys().collect::<Vec<_>>(), vec!["ann", "bo"]);
}

#[test]
fn late_linking_with_override() {
    let mut party = party();
    party
        .contain_class(ContainRequest::new("ann", hero, HeroParams { name: "Ann", gold: 30 }))
        .unwrap();
    party
        .contain_class(ContainRequest::new("bo", hero, HeroParams { name: "Bo", gold: 5 }))
        .unwrap();

    // Override: each key in turn copies its value, the last one wins.
    party.link_props_of(["ann", "bo"], ["gold"], true).unwrap();
    assert_eq!(party.get("gold"), Value::Int(5));
    assert_eq!(party.member("ann").unwrap().get("gold"), Value::Int(5));
}

#[test]
fn scoreboard_redirects_onto_container() {
    let mut party = party();
    party
        .contain_class(
            ContainRequest::new("ann", hero, HeroParams { name: "Ann", gold: 12 })
                .with_link_props(["gold"]),
        )
        .unwrap();

    let scoreboard = Object::from_fields([("gold", Value::from(999)), ("turn", Value::from(7))]);
    redirect(
        party.object(),
        [&scoreboard],
        ["gold", "turn"],
        RedirectOptions::default(),
    )
    .unwrap();

    // Container values were defined, so the scoreboard's are discarded.
    assert_eq!(scoreboard.get("gold"), Value::Int(12));
    assert_eq!(scoreboard.get("turn"), Value::Int(0));

    party.member("ann").unwrap().set("gold", 1).unwrap();
    assert_eq!(scoreboard.get("gold"), Value::Int(1));
}

#[test]
fn legacy_container_treats_zero_turn_as_unset() {
    let mut party = Container::with_config([("turn", 0)], ContainerConfig::legacy());
    assert_eq!(party.config().seed_policy, SeedPolicy::Falsy);

    let timer = |this: &Object, start: i64| -> Result<(), BoxError> {
        this.set("turn", start)?;
        Ok(())
    };
    party
        .contain_class(ContainRequest::new("timer", timer, 4).with_link_props(["turn"]))
        .unwrap();
    assert_eq!(party.get("turn"), Value::Int(4));
}

#[test]
fn missing_key_fails_after_earlier_keys_are_linked() {
    let mut party = party();
    let ann = party
        .contain_class(ContainRequest::new("ann", hero, HeroParams { name: "Ann", gold: 3 }))
        .unwrap();

    let err = party
        .link_props_of(["ann", "nobody"], ["gold"], false)
        .unwrap_err();
    assert!(matches!(err, ContainerError::KeyNotFound { ref key } if key == "nobody"));
    assert!(ann.is_linked("gold"));
    assert_eq!(party.get("gold"), Value::Int(3));
}

#[test]
fn member_can_be_a_backing_object_itself() {
    let mut party = party();
    let ann = party
        .contain_class(ContainRequest::new("ann", hero, HeroParams { name: "Ann", gold: 8 }))
        .unwrap();

    // A pet shares Ann's name; Ann's gold is shared with the party.
    let pet = Object::new();
    redirect(&ann, [&pet], ["name"], RedirectOptions::default()).unwrap();
    party.link_props_of(["ann"], ["gold"], false).unwrap();

    assert_eq!(pet.get("name"), Value::from("Ann"));
    pet.set("name", "Annie").unwrap();
    assert_eq!(ann.get("name"), Value::from("Annie"));
    assert_eq!(party.get("gold"), Value::Int(8));
}
