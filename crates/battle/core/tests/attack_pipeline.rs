use battle_core::{
    AttackContext, AttackResolver, AttackStage, BattleEnv, BattleEvent, BattleTables, Battlefield,
    Climate, CombatStats, Combatant, Diagnostic, Effects, EntityId, HeldItems, Item, Orientation,
    Position, RandomSource, RecordingDiagnostics, SequenceRng, SplashKind, StatusKind,
    StrikeOutcome, Team,
};

fn unit(id: u32, team: Team, x: i32, y: i32) -> Combatant {
    Combatant::new(EntityId(id), team, Position::new(x, y), CombatStats::default())
}

fn holding(combatant: Combatant, items: &[Item]) -> Combatant {
    combatant.with_items(HeldItems::try_from(items).unwrap())
}

fn field_with(width: u32, height: u32, units: Vec<Combatant>) -> Battlefield {
    let mut field = Battlefield::new(width, height);
    for unit in units {
        field.spawn(unit).unwrap();
    }
    field
}

fn resolve(
    field: &mut Battlefield,
    climate: Climate,
    rng: &mut dyn RandomSource,
    attacker: u32,
    target: Position,
) -> StrikeOutcome {
    let tables = BattleTables::default();
    let resolver = AttackResolver::new(BattleEnv::new(&tables, climate));
    resolver.resolve(field, rng, EntityId(attacker), target)
}

fn life(field: &Battlefield, id: u32) -> u32 {
    field.combatant(EntityId(id)).unwrap().life
}

#[test]
fn neutral_attack_deals_raw_damage_and_nothing_else() {
    let mut field = field_with(4, 4, vec![unit(1, Team::Blue, 0, 0), unit(2, Team::Red, 1, 0)]);
    let mut rng = SequenceRng::new([]);

    let outcome = resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert_eq!(outcome, StrikeOutcome::Resolved { damage: 10, critical: false });
    assert_eq!(life(&field, 2), 90);
    assert!(field.combatant(EntityId(2)).unwrap().status.is_empty());

    let attacker = field.combatant(EntityId(1)).unwrap();
    assert_eq!(attacker.counters.attack_count, 1);
    assert_eq!(attacker.target, Some(Position::new(1, 0)));
    assert_eq!(attacker.orientation, Orientation::Right);
    // Only the critical roll was drawn.
    assert_eq!(rng.consumed(), 1);
}

#[test]
fn leftovers_heal_attacker_and_adjacent_allies_only() {
    let mut field = field_with(
        4,
        4,
        vec![
            holding(unit(1, Team::Blue, 1, 1).with_life(50), &[Item::Leftovers]),
            unit(2, Team::Red, 1, 0).with_life(50),
            unit(3, Team::Blue, 0, 0).with_life(50),
            unit(4, Team::Blue, 2, 2).with_life(50),
            unit(5, Team::Red, 2, 1).with_life(50),
        ],
    );
    let mut rng = SequenceRng::new([]);

    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert_eq!(life(&field, 1), 53);
    assert_eq!(life(&field, 3), 53);
    assert_eq!(life(&field, 4), 53);
    assert_eq!(life(&field, 2), 40);
    assert_eq!(life(&field, 5), 50);
}

#[test]
fn poison_lands_only_when_draw_exceeds_chance() {
    let build = || {
        field_with(
            3,
            3,
            vec![
                unit(1, Team::Blue, 0, 0).with_effects(Effects::TOXIN),
                unit(2, Team::Red, 1, 0),
            ],
        )
    };

    let mut field = build();
    let mut rng = SequenceRng::new([0.3]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert!(!field.combatant(EntityId(2)).unwrap().status.has(StatusKind::Poison));
    assert_eq!(rng.consumed(), 2);

    let mut field = build();
    let mut rng = SequenceRng::new([0.31]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    let target = field.combatant(EntityId(2)).unwrap();
    assert_eq!(target.status.remaining(StatusKind::Poison), Some(2000));
    assert_eq!(target.status.source(StatusKind::Poison), Some(EntityId(1)));
}

#[test]
fn poison_chances_add_up() {
    let mut field = field_with(
        3,
        3,
        vec![
            unit(1, Team::Blue, 0, 0).with_effects(Effects::VENOM | Effects::TOXIN),
            unit(2, Team::Red, 1, 0),
        ],
    );
    // 0.35 would poison with TOXIN alone (0.3) but not with both (0.4).
    let mut rng = SequenceRng::new([0.35]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert!(!field.combatant(EntityId(2)).unwrap().status.has(StatusKind::Poison));
}

#[test]
fn critical_hit_multiplies_attack() {
    let stats = CombatStats {
        attack: 20,
        crit_chance: 50.0,
        crit_damage: 1.5,
        ..CombatStats::default()
    };
    let build = || {
        field_with(
            3,
            3,
            vec![
                Combatant::new(EntityId(1), Team::Blue, Position::new(0, 0), stats),
                unit(2, Team::Red, 1, 0),
            ],
        )
    };

    let mut field = build();
    let mut rng = SequenceRng::new([0.1]);
    let outcome = resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert_eq!(outcome, StrikeOutcome::Resolved { damage: 30, critical: true });
    assert_eq!(life(&field, 2), 70);
    assert_eq!(field.combatant(EntityId(2)).unwrap().counters.crit_count, 1);
    assert!(
        field
            .events()
            .contains(&BattleEvent::CriticalHit { attacker: EntityId(1), target: EntityId(2) })
    );

    let mut field = build();
    let mut rng = SequenceRng::new([0.9]);
    let outcome = resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert_eq!(outcome, StrikeOutcome::Resolved { damage: 20, critical: false });
    assert_eq!(life(&field, 2), 80);
}

#[test]
fn crit_shield_prevents_critical_hits() {
    let stats = CombatStats {
        crit_chance: 100.0,
        ..CombatStats::default()
    };
    let mut field = field_with(
        3,
        3,
        vec![
            Combatant::new(EntityId(1), Team::Blue, Position::new(0, 0), stats),
            holding(unit(2, Team::Red, 1, 0), &[Item::CritShield]),
        ],
    );
    let mut rng = SequenceRng::new([0.0]);
    let outcome = resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert_eq!(outcome, StrikeOutcome::Resolved { damage: 10, critical: false });
}

#[test]
fn crit_burst_uses_highest_tier_around_attacker() {
    let stats = CombatStats {
        crit_chance: 100.0,
        range: 3,
        ..CombatStats::default()
    };
    let mut field = field_with(
        5,
        5,
        vec![
            Combatant::new(EntityId(1), Team::Blue, Position::new(0, 0), stats)
                .with_effects(Effects::CRIT_BURST_I | Effects::CRIT_BURST_III),
            unit(2, Team::Red, 3, 0),
            unit(3, Team::Red, 1, 0),
        ],
    );
    let mut rng = SequenceRng::new([0.0]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(3, 0));

    // Tier III splash only, never I + III.
    assert_eq!(life(&field, 3), 40);
    assert_eq!(field.combatant(EntityId(3)).unwrap().counters.fairy_crit_count, 1);
    // The target is not next to the attacker: crit damage only.
    assert_eq!(life(&field, 2), 85);
    assert_eq!(field.combatant(EntityId(2)).unwrap().counters.fairy_crit_count, 0);
}

#[test]
fn crit_burst_of_target_hits_its_own_enemies() {
    let stats = CombatStats {
        crit_chance: 100.0,
        range: 3,
        ..CombatStats::default()
    };
    let mut field = field_with(
        5,
        5,
        vec![
            Combatant::new(EntityId(1), Team::Blue, Position::new(0, 0), stats),
            unit(2, Team::Red, 3, 0).with_effects(Effects::CRIT_BURST_II),
            unit(3, Team::Blue, 3, 1),
        ],
    );
    let mut rng = SequenceRng::new([0.0]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(3, 0));

    assert_eq!(life(&field, 3), 70);
    assert!(field.events().contains(&BattleEvent::Splash {
        source: EntityId(1),
        target: EntityId(3),
        kind: SplashKind::CritBurst,
    }));
}

#[test]
fn static_coil_discharges_on_fourth_attack() {
    let mut field = field_with(
        5,
        5,
        vec![
            holding(unit(1, Team::Blue, 0, 0), &[Item::StaticCoil]),
            unit(2, Team::Red, 1, 0),
            unit(3, Team::Red, 4, 4),
        ],
    );
    let mut rng = SequenceRng::new([]);

    for _ in 0..3 {
        resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    }
    assert_eq!(field.combatant(EntityId(1)).unwrap().counters.static_holder_count, 3);
    assert_eq!(life(&field, 3), 100);

    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));
    assert_eq!(field.combatant(EntityId(1)).unwrap().counters.static_holder_count, 0);
    assert_eq!(life(&field, 2), 100 - 40 - 8);
    assert_eq!(life(&field, 3), 92);
    assert_eq!(field.combatant(EntityId(2)).unwrap().counters.static_count, 1);
    assert_eq!(field.combatant(EntityId(3)).unwrap().counters.static_count, 1);
}

#[test]
fn cleave_hits_first_enemy_next_to_target() {
    let mut field = field_with(
        4,
        4,
        vec![
            holding(unit(1, Team::Blue, 0, 0), &[Item::CleavingBlade]),
            unit(2, Team::Red, 1, 0),
            unit(3, Team::Red, 2, 0),
            unit(4, Team::Red, 2, 1),
        ],
    );
    let mut rng = SequenceRng::new([]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert_eq!(life(&field, 2), 90);
    // ceil(0.75 * 10)
    assert_eq!(life(&field, 3), 92);
    assert_eq!(life(&field, 4), 100);
}

#[test]
fn snow_freeze_uses_upper_band_and_always_draws() {
    let mut field = field_with(
        3,
        3,
        vec![
            unit(1, Team::Blue, 0, 0).with_effects(Effects::CHILL | Effects::DEEP_FREEZE),
            unit(2, Team::Red, 1, 0),
        ],
    );
    let mut rng = SequenceRng::new([0.7]);
    resolve(&mut field, Climate::Snow, &mut rng, 1, Position::new(1, 0));
    let target = field.combatant(EntityId(2)).unwrap();
    assert_eq!(target.status.remaining(StatusKind::Freeze), Some(2000));
    assert!(!target.can_act());

    // Under snow the freeze roll is drawn even without freeze effects.
    let mut field = field_with(3, 3, vec![unit(1, Team::Blue, 0, 0), unit(2, Team::Red, 1, 0)]);
    let mut rng = SequenceRng::new([]);
    resolve(&mut field, Climate::Snow, &mut rng, 1, Position::new(1, 0));
    assert_eq!(rng.consumed(), 2);
    assert!(!field.combatant(EntityId(2)).unwrap().status.has(StatusKind::Freeze));
}

#[test]
fn frozen_attacker_only_counts_the_attempt() {
    let mut attacker = unit(1, Team::Blue, 0, 0);
    attacker.status.trigger(StatusKind::Freeze, 1000, None);
    let mut field = field_with(3, 3, vec![attacker, unit(2, Team::Red, 1, 0)]);
    let mut rng = SequenceRng::new([]);

    let outcome = resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert_eq!(outcome, StrikeOutcome::Incapacitated);
    assert_eq!(life(&field, 2), 100);
    assert_eq!(rng.consumed(), 0);
    let attacker = field.combatant(EntityId(1)).unwrap();
    assert_eq!(attacker.counters.attack_count, 1);
    assert_eq!(attacker.target, Some(Position::new(1, 0)));
}

#[test]
fn empty_or_friendly_cell_is_no_target() {
    let mut field = field_with(3, 3, vec![unit(1, Team::Blue, 0, 0), unit(2, Team::Blue, 1, 0)]);
    let mut rng = SequenceRng::new([]);

    assert_eq!(
        resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(2, 2)),
        StrikeOutcome::NoTarget
    );
    assert_eq!(
        resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0)),
        StrikeOutcome::NoTarget
    );
    assert_eq!(field.combatant(EntityId(1)).unwrap().counters.attack_count, 2);
    assert_eq!(life(&field, 2), 100);
}

#[test]
fn on_hit_items_and_effects() {
    let mut field = field_with(
        3,
        3,
        vec![
            holding(
                unit(1, Team::Blue, 0, 0).with_effects(Effects::VENGEANCE | Effects::RETRIBUTION | Effects::HEX),
                &[Item::ManaCharm, Item::ArmorPiercer, Item::Accelerator],
            ),
            holding(unit(2, Team::Red, 1, 0), &[Item::SmokeBomb]),
        ],
    );
    let mut rng = SequenceRng::new([]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    let attacker = field.combatant(EntityId(1)).unwrap();
    assert_eq!(attacker.mana, 5 + 15 + 8);
    assert!((attacker.stats.attack_speed - 1.06).abs() < 1e-9);
    assert_eq!(attacker.status.remaining(StatusKind::Smoke), Some(5000));
    assert_eq!(attacker.status.source(StatusKind::Smoke), Some(EntityId(2)));

    let target = field.combatant(EntityId(2)).unwrap();
    assert_eq!(target.status.remaining(StatusKind::Silence), Some(3000));
    assert_eq!(target.status.remaining(StatusKind::ArmorReduction), Some(5000));
}

#[test]
fn rune_protection_refuses_harmful_statuses() {
    let mut target = unit(2, Team::Red, 1, 0);
    target.status.trigger(StatusKind::RuneProtect, 5000, None);
    let mut field = field_with(
        3,
        3,
        vec![unit(1, Team::Blue, 0, 0).with_effects(Effects::HAUNT), target],
    );
    let mut rng = SequenceRng::new([]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert!(!field.combatant(EntityId(2)).unwrap().status.has(StatusKind::Silence));
    assert_eq!(life(&field, 2), 90);
}

#[test]
fn lethal_hit_kills_and_later_stages_still_run() {
    let mut field = field_with(
        3,
        3,
        vec![
            holding(unit(1, Team::Blue, 0, 0).with_life(50), &[Item::Leftovers]),
            unit(2, Team::Red, 1, 0).with_life(5),
        ],
    );
    let mut rng = SequenceRng::new([]);
    resolve(&mut field, Climate::Neutral, &mut rng, 1, Position::new(1, 0));

    assert!(!field.combatant(EntityId(2)).unwrap().is_alive());
    assert!(field.occupant(Position::new(1, 0)).is_none());
    assert_eq!(life(&field, 1), 53);
    assert!(
        field
            .events()
            .contains(&BattleEvent::Died { id: EntityId(2), killer: Some(EntityId(1)) })
    );
}

#[test]
fn unclear_orientation_falls_back_and_reports() {
    let mut attacker = unit(1, Team::Blue, 0, 0);
    attacker.orientation = Orientation::Up;
    let mut field = field_with(3, 3, vec![attacker, unit(2, Team::Red, 1, 0)]);

    let tables = BattleTables::default();
    let diagnostics = RecordingDiagnostics::new();
    let env = BattleEnv::new(&tables, Climate::Neutral).with_diagnostics(&diagnostics);
    let resolver = AttackResolver::new(env);

    let mut ctx = AttackContext {
        attacker: EntityId(1),
        team: Team::Blue,
        attacker_position: Position::new(0, 0),
        target: EntityId(2),
        target_position: Position::new(0, 0),
        damage: 0,
        critical: false,
    };
    let mut rng = SequenceRng::new([]);
    resolver.run_stage(AttackStage::Orient, &mut ctx, &mut field, &mut rng);

    assert_eq!(field.combatant(EntityId(1)).unwrap().orientation, Orientation::DownLeft);
    assert_eq!(
        diagnostics.reports(),
        vec![Diagnostic::UnclearOrientation {
            attacker: EntityId(1),
            position: Position::new(0, 0),
        }]
    );
}
