//! Seeded standard catalog
//!
//! The real host populates the catalog from its reflection system with tens
//! of thousands of entries. The driver binary and the tests need a bounded
//! stand-in; this module seeds one with a representative slice of standard
//! library members, instance members, casts, and an unclassifiable entry.

use super::provider::ScriptCatalog;
use super::template::{MemberSpec, NodeTemplate, TemplateKind};
use crate::graph::{ParamSpec, PinType};
use once_cell::sync::Lazy;

struct MemberSeed {
    display_name: &'static str,
    category: &'static str,
    tooltip: &'static str,
    keywords: &'static [&'static str],
    spec: fn() -> MemberSpec,
}

static STANDARD_MEMBERS: Lazy<Vec<MemberSeed>> = Lazy::new(|| {
    vec![
        MemberSeed {
            display_name: "Print String",
            category: "Development",
            tooltip: "Prints a string to the log and optionally the screen",
            keywords: &["log", "print", "debug", "string"],
            spec: || {
                MemberSpec::new("PrintString")
                    .owned_by("SystemLibrary")
                    .in_module("Engine")
                    .static_member()
                    .with_params(vec![
                        ParamSpec::input("InString", PinType::new("string")).with_default("Hello"),
                        ParamSpec::input("PrintToLog", PinType::new("bool")).with_default("true"),
                        ParamSpec::input("Duration", PinType::new("float")).with_default("2.0"),
                    ])
            },
        },
        MemberSeed {
            display_name: "Delay",
            category: "Utilities",
            tooltip: "Performs a latent delay before continuing execution",
            keywords: &["wait", "latent", "time"],
            spec: || {
                MemberSpec::new("Delay")
                    .owned_by("SystemLibrary")
                    .in_module("Engine")
                    .static_member()
                    .with_params(vec![
                        ParamSpec::input("Duration", PinType::new("float")).with_default("0.2"),
                    ])
            },
        },
        MemberSeed {
            display_name: "Add (float)",
            category: "Math",
            tooltip: "Adds two floats",
            keywords: &["+", "plus", "sum", "arithmetic"],
            spec: || {
                MemberSpec::new("Add_FloatFloat")
                    .owned_by("MathLibrary")
                    .in_module("Engine")
                    .static_member()
                    .pure_member()
                    .with_params(vec![
                        ParamSpec::input("A", PinType::new("float")).with_default("0.0"),
                        ParamSpec::input("B", PinType::new("float")).with_default("0.0"),
                        ParamSpec::output("ReturnValue", PinType::new("float")),
                    ])
            },
        },
        MemberSeed {
            display_name: "Multiply (float)",
            category: "Math",
            tooltip: "Multiplies two floats",
            keywords: &["*", "times", "product", "arithmetic"],
            spec: || {
                MemberSpec::new("Multiply_FloatFloat")
                    .owned_by("MathLibrary")
                    .in_module("Engine")
                    .static_member()
                    .pure_member()
                    .with_params(vec![
                        ParamSpec::input("A", PinType::new("float")).with_default("0.0"),
                        ParamSpec::input("B", PinType::new("float")).with_default("0.0"),
                        ParamSpec::output("ReturnValue", PinType::new("float")),
                    ])
            },
        },
        MemberSeed {
            display_name: "Spawn Actor From Class",
            category: "Game",
            tooltip: "Spawns an instance of the chosen class into the world",
            keywords: &["spawn", "create", "instantiate"],
            spec: || {
                MemberSpec::new("SpawnActorFromClass")
                    .owned_by("GameplayLibrary")
                    .in_module("Engine")
                    .static_member()
                    .with_params(vec![
                        ParamSpec::input("Class", PinType::new("class")),
                        ParamSpec::input("SpawnTransform", PinType::new("transform")),
                        ParamSpec::output("ReturnValue", PinType::object("Actor")),
                    ])
            },
        },
        MemberSeed {
            display_name: "Get Player Pawn",
            category: "Game",
            tooltip: "Returns the pawn for the given player index",
            keywords: &["player", "pawn"],
            spec: || {
                MemberSpec::new("GetPlayerPawn")
                    .owned_by("GameplayLibrary")
                    .in_module("Engine")
                    .static_member()
                    .pure_member()
                    .with_params(vec![
                        ParamSpec::input("PlayerIndex", PinType::new("int")).with_default("0"),
                        ParamSpec::output("ReturnValue", PinType::object("Pawn")),
                    ])
            },
        },
        MemberSeed {
            display_name: "Set Actor Hidden In Game",
            category: "Rendering",
            tooltip: "Sets whether this actor is hidden during gameplay",
            keywords: &["visibility", "hide", "show"],
            spec: || {
                MemberSpec::new("SetActorHiddenInGame")
                    .owned_by("Actor")
                    .in_module("Engine")
                    .with_params(vec![
                        ParamSpec::input("NewHidden", PinType::new("bool")).with_default("false"),
                    ])
            },
        },
        MemberSeed {
            display_name: "Get Actor Location",
            category: "Transformation",
            tooltip: "Returns the actor's world-space location",
            keywords: &["position", "where", "translation"],
            spec: || {
                MemberSpec::new("GetActorLocation")
                    .owned_by("Actor")
                    .in_module("Engine")
                    .const_member()
                    .pure_member()
                    .with_params(vec![ParamSpec::output("ReturnValue", PinType::new("vector"))])
            },
        },
        // Same member name under two owners; resolution tier 4 has to
        // disambiguate these by context and owning-type hint
        MemberSeed {
            display_name: "Get Velocity",
            category: "Physics",
            tooltip: "Returns the actor's velocity",
            keywords: &["speed", "movement"],
            spec: || {
                MemberSpec::new("GetVelocity")
                    .owned_by("Actor")
                    .in_module("Engine")
                    .const_member()
                    .pure_member()
                    .with_params(vec![ParamSpec::output("ReturnValue", PinType::new("vector"))])
            },
        },
        MemberSeed {
            display_name: "Get Velocity",
            category: "Physics",
            tooltip: "Returns the component's velocity",
            keywords: &["speed", "movement"],
            spec: || {
                MemberSpec::new("GetVelocity")
                    .owned_by("MovementComponent")
                    .in_module("Engine")
                    .const_member()
                    .pure_member()
                    .with_params(vec![ParamSpec::output("ReturnValue", PinType::new("vector"))])
            },
        },
    ]
});

const CAST_TARGETS: &[&str] = &["Actor", "Pawn", "Character", "Controller"];

/// Builds the seeded standard catalog
pub fn standard_catalog() -> ScriptCatalog {
    let mut catalog = ScriptCatalog::new();

    for seed in STANDARD_MEMBERS.iter() {
        let spec = (seed.spec)();
        let scope = spec.owning_type.clone();
        let mut template = NodeTemplate::new(
            seed.display_name,
            seed.category,
            TemplateKind::CallableMember(spec),
        )
        .with_tooltip(seed.tooltip)
        .with_keywords(seed.keywords.to_vec());
        if let Some(scope) = scope {
            template = template.with_scope(scope);
        }
        catalog.register(template);
    }

    for target in CAST_TARGETS {
        catalog.register(
            NodeTemplate::new(
                format!("Cast To {}", target),
                "Casting",
                TemplateKind::Cast {
                    target_type: target.to_string(),
                },
            )
            .with_keywords(vec!["cast", "convert", "as"]),
        );
    }

    // A contribution the extractor cannot classify; it must stay creatable
    catalog.register(
        NodeTemplate::new("Timeline", "Animation", TemplateKind::Opaque)
            .with_tooltip("Drives values over time"),
    );

    catalog
}
