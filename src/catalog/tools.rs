//! Catalog entries.

use super::{ArgumentSchema, PropertySpec, PropertyType, ToolDescriptor};

const DEFAULT_PIXELS_PER_SECOND: i64 = 100;

fn string(name: &'static str) -> PropertySpec {
    PropertySpec::new(name, PropertyType::String)
}

fn seconds(name: &'static str) -> PropertySpec {
    PropertySpec::new(name, PropertyType::Number).min(0)
}

fn track(name: &'static str) -> PropertySpec {
    PropertySpec::new(name, PropertyType::Integer).min(1)
}

fn pixels_per_second() -> PropertySpec {
    PropertySpec::new("pixels_per_second", PropertyType::Integer)
        .min(1)
        .default_value(DEFAULT_PIXELS_PER_SECOND)
}

pub(super) fn build_catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "AddMediaById",
            description: "Add an asset (by its media bin id) to a track at a start time, optionally with a duration or end time.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    string("scrubber_id"),
                    track("track_number"),
                    seconds("start_seconds"),
                    seconds("duration_seconds"),
                    seconds("end_seconds"),
                    pixels_per_second(),
                ],
                required: vec!["scrubber_id", "track_number", "start_seconds"],
                additional_properties: true,
            },
        },
        ToolDescriptor {
            name: "AddMediaByName",
            description: "Add an asset by case-insensitive substring of its name to a track at a start time; optionally specify duration or end time.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    string("scrubber_name"),
                    track("track_number"),
                    seconds("start_seconds"),
                    seconds("duration_seconds"),
                    seconds("end_seconds"),
                    pixels_per_second(),
                ],
                required: vec!["scrubber_name", "track_number", "start_seconds"],
                additional_properties: true,
            },
        },
        ToolDescriptor {
            name: "CreateTrack",
            description: "Create a new empty track at the end of the timeline.",
            argument_schema: ArgumentSchema::default(),
        },
        ToolDescriptor {
            name: "CreateTracks",
            description: "Create N new empty tracks at the end of the timeline.",
            argument_schema: ArgumentSchema {
                properties: vec![PropertySpec::new("count", PropertyType::Integer).min(1)],
                required: vec!["count"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "PlaceAllAssetsParallel",
            description: "Place all media bin assets each on a separate track in parallel starting at start_seconds.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    PropertySpec::new("start_seconds", PropertyType::Number).default_value(0),
                    PropertySpec::new("duration_seconds", PropertyType::Number),
                    pixels_per_second(),
                ],
                required: vec![],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "MoveScrubber",
            description: "Move an existing scrubber to a new time and optionally a new track.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    string("scrubber_id"),
                    seconds("new_position_seconds"),
                    track("new_track_number"),
                    pixels_per_second(),
                ],
                required: vec!["scrubber_id", "new_position_seconds", "new_track_number"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "ResizeScrubber",
            description: "Change the duration of an existing scrubber.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    string("scrubber_id"),
                    seconds("new_duration_seconds"),
                    pixels_per_second(),
                ],
                required: vec!["scrubber_id", "new_duration_seconds"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "MoveScrubbersByOffset",
            description: "Move multiple scrubbers by a time offset (can be negative).",
            argument_schema: ArgumentSchema {
                properties: vec![
                    PropertySpec::new("scrubber_ids", PropertyType::StringArray),
                    PropertySpec::new("offset_seconds", PropertyType::Number),
                    pixels_per_second(),
                ],
                required: vec!["scrubber_ids", "offset_seconds"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "DeleteScrubbersInTrack",
            description: "Delete all scrubbers in a given track (1-based).",
            argument_schema: ArgumentSchema {
                properties: vec![track("track_number")],
                required: vec!["track_number"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "UpdateTextContent",
            description: "Update the text content of a text scrubber.",
            argument_schema: ArgumentSchema {
                properties: vec![string("scrubber_id"), string("new_text_content")],
                required: vec!["scrubber_id", "new_text_content"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "UpdateTextStyle",
            description: "Update style properties of a text scrubber.",
            argument_schema: ArgumentSchema {
                properties: vec![
                    string("scrubber_id"),
                    PropertySpec::new("fontSize", PropertyType::Integer).min(1),
                    string("fontFamily"),
                    string("color"),
                    string("textAlign").one_of(&["left", "center", "right"]),
                    string("fontWeight").one_of(&["normal", "bold"]),
                ],
                required: vec!["scrubber_id"],
                additional_properties: true,
            },
        },
        ToolDescriptor {
            name: "SetResolution",
            description: "Set the project resolution (width x height).",
            argument_schema: ArgumentSchema {
                properties: vec![
                    PropertySpec::new("width", PropertyType::Integer).min(1),
                    PropertySpec::new("height", PropertyType::Integer).min(1),
                ],
                required: vec!["width", "height"],
                additional_properties: false,
            },
        },
        ToolDescriptor {
            name: "SetAutoSize",
            description: "Toggle autosize for the composition (overrides explicit resolution when true).",
            argument_schema: ArgumentSchema {
                properties: vec![PropertySpec::new("auto", PropertyType::Boolean)],
                required: vec!["auto"],
                additional_properties: false,
            },
        },
    ]
}
