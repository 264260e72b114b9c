//! Shared fixtures: a small static dataset, unit builders, and recording
//! ports for registry tests.

use crate::battle::registry::{BattleRegistry, RegistryConfig, SessionId};
use crate::battle::state::{BattleCategory, BattleEvent, BattleKind, DriveMode, RewardCategory};
use crate::data::StaticDataProvider;
use crate::ports::{EconomyPort, PersistencePort, PresentationSink, UnitRef};
use crate::rng::RandomSource;
use crate::unit::{ActorKind, Combatant, FightingUnit, StatStages};
use async_trait::async_trait;
use schema::{
    Ailment, BaseStats, DamageClass, EvolutionData, ItemId, MoveData, MoveId, MoveMeta,
    SpeciesData, SpeciesId, StatChange, StatKind, TargetScope, TypeId,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

// Type ids from the upstream dataset.
pub const NORMAL: TypeId = TypeId(1);
pub const GROUND: TypeId = TypeId(5);
pub const FIRE: TypeId = TypeId(10);
pub const WATER: TypeId = TypeId(11);
pub const GRASS: TypeId = TypeId(12);
pub const ELECTRIC: TypeId = TypeId(13);

pub const BULBASAUR: SpeciesId = SpeciesId(1);
pub const PIKACHU: SpeciesId = SpeciesId(25);
pub const CHARMANDER: SpeciesId = SpeciesId(4);
pub const CHARMELEON: SpeciesId = SpeciesId(5);
pub const SQUIRTLE: SpeciesId = SpeciesId(7);
pub const DIGLETT: SpeciesId = SpeciesId(50);
pub const MEWTWO: SpeciesId = SpeciesId(150);

pub const TACKLE: MoveId = MoveId(33);
pub const THUNDERBOLT: MoveId = MoveId(85);
pub const SWIFT: MoveId = MoveId(129);
pub const GROWL: MoveId = MoveId(45);
pub const SWORDS_DANCE: MoveId = MoveId(14);
pub const FURY_ATTACK: MoveId = MoveId(31);
pub const MEGA_DRAIN: MoveId = MoveId(72);
pub const DOUBLE_EDGE: MoveId = MoveId(38);
pub const POISON_POWDER: MoveId = MoveId(77);
pub const EARTHQUAKE: MoveId = MoveId(89);
pub const SNORE: MoveId = MoveId(173);
/// Fixture-only move with accuracy 0; nothing in the real dataset has one.
pub const NULL_SHOT: MoveId = MoveId(999);

/// In-memory static data provider, loaded from the JSON fixture below plus
/// programmatic species/efficacy entries.
pub struct FixtureData {
    moves: HashMap<MoveId, MoveData>,
    species: HashMap<SpeciesId, SpeciesData>,
    efficacy: HashMap<(TypeId, TypeId), f64>,
}

// A couple of plain attacks come in as JSON to keep the serde path honest;
// moves with meta records are easier to read built in code.
const MOVE_FIXTURES: &str = r#"[
    {
        "id": 33, "name": "Tackle", "power": 40, "accuracy": 100,
        "priority": 0, "damage_class": "Physical", "type_id": 1,
        "target": 0
    },
    {
        "id": 129, "name": "Swift", "power": 60, "accuracy": null,
        "priority": 0, "damage_class": "Special", "type_id": 1,
        "target": 0
    },
    {
        "id": 999, "name": "Null Shot", "power": 40, "accuracy": 0,
        "priority": 0, "damage_class": "Physical", "type_id": 1,
        "target": 0
    }
]"#;

impl FixtureData {
    pub fn new() -> Self {
        let mut moves: HashMap<MoveId, MoveData> = HashMap::new();

        let from_json: Vec<MoveData> =
            serde_json::from_str(MOVE_FIXTURES).expect("move fixtures parse");
        for mv in from_json {
            moves.insert(mv.id, mv);
        }

        let coded = [
            MoveData {
                id: THUNDERBOLT,
                name: "Thunderbolt".to_string(),
                power: Some(90),
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Special,
                type_id: ELECTRIC,
                target: TargetScope(0),
                meta: MoveMeta {
                    ailment: Some(Ailment::Paralysis),
                    ailment_chance: 10,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: GROWL,
                name: "Growl".to_string(),
                power: None,
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Status,
                type_id: NORMAL,
                target: TargetScope(0),
                meta: MoveMeta {
                    stat_change: Some(StatChange {
                        stat: StatKind::Attack,
                        delta: -1,
                    }),
                    stat_chance: 100,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: SWORDS_DANCE,
                name: "Swords Dance".to_string(),
                power: None,
                accuracy: None,
                priority: 0,
                damage_class: DamageClass::Status,
                type_id: NORMAL,
                target: TargetScope(schema::TARGET_USER),
                meta: MoveMeta {
                    stat_change: Some(StatChange {
                        stat: StatKind::Attack,
                        delta: 2,
                    }),
                    stat_chance: 100,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: FURY_ATTACK,
                name: "Fury Attack".to_string(),
                power: Some(15),
                accuracy: Some(85),
                priority: 0,
                damage_class: DamageClass::Physical,
                type_id: NORMAL,
                target: TargetScope(0),
                meta: MoveMeta {
                    min_hits: Some(2),
                    max_hits: Some(5),
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: MEGA_DRAIN,
                name: "Mega Drain".to_string(),
                power: Some(40),
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Special,
                type_id: GRASS,
                target: TargetScope(0),
                meta: MoveMeta {
                    drain_pct: 50,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: DOUBLE_EDGE,
                name: "Double-Edge".to_string(),
                power: Some(120),
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Physical,
                type_id: NORMAL,
                target: TargetScope(0),
                meta: MoveMeta {
                    drain_pct: -25,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: POISON_POWDER,
                name: "Poison Powder".to_string(),
                power: None,
                accuracy: Some(75),
                priority: 0,
                damage_class: DamageClass::Status,
                type_id: GRASS,
                target: TargetScope(0),
                meta: MoveMeta {
                    ailment: Some(Ailment::Poison),
                    ailment_chance: 100,
                    ..MoveMeta::default()
                },
            },
            MoveData {
                id: EARTHQUAKE,
                name: "Earthquake".to_string(),
                power: Some(100),
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Physical,
                type_id: GROUND,
                target: TargetScope(9),
                meta: MoveMeta::default(),
            },
            MoveData {
                id: SNORE,
                name: "Snore".to_string(),
                power: Some(50),
                accuracy: Some(100),
                priority: 0,
                damage_class: DamageClass::Special,
                type_id: NORMAL,
                target: TargetScope(0),
                meta: MoveMeta::default(),
            },
        ];
        for mv in coded {
            moves.insert(mv.id, mv);
        }

        let mut species = HashMap::new();
        let mut add_species = |id: SpeciesId,
                               name: &str,
                               types: Vec<TypeId>,
                               evolution: Option<EvolutionData>| {
            species.insert(
                id,
                SpeciesData {
                    id,
                    name: name.to_string(),
                    types,
                    base_stats: BaseStats {
                        hp: 50,
                        attack: 60,
                        defense: 50,
                        sp_attack: 60,
                        sp_defense: 50,
                        speed: 70,
                    },
                    evolution,
                },
            );
        };
        add_species(BULBASAUR, "Bulbasaur", vec![GRASS], None);
        add_species(PIKACHU, "Pikachu", vec![ELECTRIC], None);
        add_species(
            CHARMANDER,
            "Charmander",
            vec![FIRE],
            Some(EvolutionData {
                evolves_into: CHARMELEON,
                at_level: 16,
            }),
        );
        add_species(CHARMELEON, "Charmeleon", vec![FIRE], None);
        add_species(SQUIRTLE, "Squirtle", vec![WATER], None);
        add_species(DIGLETT, "Diglett", vec![GROUND], None);
        add_species(MEWTWO, "Mewtwo", vec![NORMAL], None);

        let mut efficacy = HashMap::new();
        for (attack, defend, multiplier) in [
            (ELECTRIC, WATER, 2.0),
            (ELECTRIC, GROUND, 0.0),
            (ELECTRIC, GRASS, 0.5),
            (WATER, FIRE, 2.0),
            (FIRE, GRASS, 2.0),
            (FIRE, WATER, 0.5),
            (GRASS, WATER, 2.0),
            (GROUND, FIRE, 2.0),
            (GROUND, ELECTRIC, 2.0),
        ] {
            efficacy.insert((attack, defend), multiplier);
        }

        Self {
            moves,
            species,
            efficacy,
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl StaticDataProvider for FixtureData {
    fn move_by_id(&self, id: MoveId) -> Option<&MoveData> {
        self.moves.get(&id)
    }

    fn species_by_id(&self, id: SpeciesId) -> Option<&SpeciesData> {
        self.species.get(&id)
    }

    fn type_efficacy(&self, attack: TypeId, defend: TypeId) -> f64 {
        self.efficacy.get(&(attack, defend)).copied().unwrap_or(1.0)
    }

    fn moves_learnable_by(&self, _species: SpeciesId) -> Vec<MoveId> {
        vec![TACKLE, GROWL]
    }
}

/// Builder for unit snapshots in the shape the §8 scenarios need.
pub struct TestUnitBuilder {
    unit: FightingUnit,
}

impl TestUnitBuilder {
    pub fn new(species: SpeciesId, name: &str, level: u8) -> Self {
        Self {
            unit: FightingUnit {
                species,
                name: name.to_string(),
                level,
                hp: 100,
                max_hp: 100,
                stats: BaseStats {
                    hp: 100,
                    attack: 100,
                    defense: 50,
                    sp_attack: 100,
                    sp_defense: 50,
                    speed: 80,
                },
                ivs: [15; 6],
                nature_id: 0,
                held_item: None,
                xp: 0,
                moves: vec![TACKLE],
                ailments: HashSet::new(),
                stages: StatStages::default(),
            },
        }
    }

    pub fn with_hp(mut self, hp: u16, max_hp: u16) -> Self {
        self.unit.hp = hp;
        self.unit.max_hp = max_hp;
        self
    }

    pub fn with_moves(mut self, moves: Vec<MoveId>) -> Self {
        self.unit.moves = moves;
        self
    }

    pub fn with_stats(mut self, stats: BaseStats) -> Self {
        self.unit.stats = stats;
        self
    }

    pub fn with_ailment(mut self, ailment: Ailment) -> Self {
        self.unit.ailments.insert(ailment);
        self
    }

    pub fn with_stages(mut self, stages: StatStages) -> Self {
        self.unit.stages = stages;
        self
    }

    pub fn with_held_item(mut self, item: ItemId) -> Self {
        self.unit.held_item = Some(item);
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.unit.xp = xp;
        self
    }

    pub fn build(self) -> FightingUnit {
        self.unit
    }
}

pub fn human(actor: u64, unit: FightingUnit) -> Combatant {
    Combatant::new(schema::ActorId(actor), ActorKind::Human, unit)
}

pub fn scripted(actor: u64, unit: FightingUnit) -> Combatant {
    Combatant::new(schema::ActorId(actor), ActorKind::Scripted, unit)
}

// --- Recording ports -----------------------------------------------------

#[derive(Default)]
pub struct RecordingSink {
    pub published: Mutex<Vec<(SessionId, Vec<BattleEvent>)>>,
}

impl RecordingSink {
    pub fn events_for(&self, session: SessionId) -> Vec<BattleEvent> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == session)
            .flat_map(|(_, events)| events.clone())
            .collect()
    }
}

#[async_trait]
impl PresentationSink for RecordingSink {
    async fn publish(&self, session: SessionId, events: &[BattleEvent]) {
        self.published
            .lock()
            .unwrap()
            .push((session, events.to_vec()));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrantRecord {
    pub actor: schema::ActorId,
    pub credits: u32,
    pub shards: u32,
    pub redeems: u32,
    pub items: Vec<ItemId>,
}

#[derive(Default)]
pub struct RecordingEconomy {
    pub grants: Mutex<Vec<GrantRecord>>,
}

#[async_trait]
impl EconomyPort for RecordingEconomy {
    async fn grant(
        &self,
        actor: schema::ActorId,
        credits: u32,
        shards: u32,
        redeems: u32,
        items: &[ItemId],
    ) {
        self.grants.lock().unwrap().push(GrantRecord {
            actor,
            credits,
            shards,
            redeems,
            items: items.to_vec(),
        });
    }
}

#[derive(Default)]
pub struct RecordingPersistence {
    pub saved: Mutex<Vec<(schema::ActorId, FightingUnit)>>,
    pub transfers: Mutex<Vec<(FightingUnit, schema::ActorId)>>,
}

#[async_trait]
impl PersistencePort for RecordingPersistence {
    async fn load_unit(&self, _unit: UnitRef) -> Option<FightingUnit> {
        None
    }

    async fn save_unit(&self, owner: schema::ActorId, unit: &FightingUnit) {
        self.saved.lock().unwrap().push((owner, unit.clone()));
    }

    async fn transfer_unit(&self, unit: &FightingUnit, to: schema::ActorId) {
        self.transfers.lock().unwrap().push((unit.clone(), to));
    }
}

/// Everything a registry test needs, wired to recording ports.
pub struct TestHarness {
    pub registry: Arc<BattleRegistry>,
    pub sink: Arc<RecordingSink>,
    pub economy: Arc<RecordingEconomy>,
    pub persistence: Arc<RecordingPersistence>,
}

pub fn build_registry(config: RegistryConfig, rng: Box<dyn RandomSource>) -> TestHarness {
    let sink = Arc::new(RecordingSink::default());
    let economy = Arc::new(RecordingEconomy::default());
    let persistence = Arc::new(RecordingPersistence::default());

    let registry = Arc::new(BattleRegistry::new(
        config,
        FixtureData::shared(),
        persistence.clone(),
        economy.clone(),
        sink.clone(),
        rng,
    ));

    TestHarness {
        registry,
        sink,
        economy,
        persistence,
    }
}

/// Shorthand for the common human-vs-scripted Basic session.
pub async fn create_basic_session(
    harness: &TestHarness,
    player: Combatant,
    opponent: Combatant,
    reward: RewardCategory,
) -> SessionId {
    harness
        .registry
        .create_session(
            player,
            opponent,
            BattleKind::OneVsOne,
            DriveMode::Scripted,
            reward,
            BattleCategory::Normal,
        )
        .await
        .expect("session creation")
}
