//! Core Tests
//!
//! Version table, entry classification and metadata documents used together.

use pak_parser_core::{
    AssetEntry, EngineVersion, EntryClass, LoadedObject, MetadataAggregator, MetadataStyle,
    PixelFormat, PrimaryKind, Resolution, TextureData, TypeMappings, classify,
};

#[test]
fn test_version_table() {
    let table = [
        ("4.26", "GAME_UE4_26"),
        ("5.1", "GAME_UE5_1"),
        ("5.2", "GAME_UE5_2"),
        ("5.3", "GAME_UE5_3"),
    ];
    for (input, generation) in table {
        match EngineVersion::resolve(input) {
            Resolution::Resolved(engine) => assert_eq!(engine.generation(), generation),
            Resolution::Unsupported(v) => panic!("{} should resolve", v),
        }
    }

    for input in ["9.9", "5.0", "", " 5.2", "5.2.0"] {
        assert!(matches!(
            EngineVersion::resolve(input),
            Resolution::Unsupported(ref v) if v == input
        ));
    }
}

#[test]
fn test_only_primary_entries_reach_metadata() {
    let entries = [
        "Game/Content/T_Rock.uasset",
        "Game/Content/T_Rock.uexp",
        "Game/Content/T_Rock.ubulk",
        "Game/Content/Shaders.uptnl",
        "Game/Maps/Main.umap",
        "Game/Content/readme.txt",
    ];

    let mut metadata = MetadataAggregator::new();
    for path in entries {
        let entry = AssetEntry::new(path);
        if let EntryClass::Primary(kind) = entry.classify() {
            let mut objects = vec![LoadedObject::new("Root", "Package")];
            if kind == PrimaryKind::Asset {
                objects.push(LoadedObject::texture(
                    "T_Rock",
                    TextureData::new(1, 1, PixelFormat::G8, vec![0]),
                ));
            }
            metadata.record(&entry.path, &objects);
        }
    }

    assert_eq!(classify("Game/Content/readme.txt"), EntryClass::Ignored);
    assert_eq!(
        metadata.entry_paths().collect::<Vec<_>>(),
        vec!["Game/Content/T_Rock.uasset", "Game/Maps/Main.umap"]
    );

    let document: serde_json::Value =
        serde_json::from_slice(&metadata.to_json(MetadataStyle::Described).unwrap()).unwrap();
    assert_eq!(
        document["Game/Content/T_Rock.uasset"][1],
        serde_json::json!({"name": "T_Rock", "class": "Texture2D"})
    );
}

#[test]
fn test_open_mappings_from_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Mappings.usmap");

    let mut data = Vec::new();
    data.extend_from_slice(&0x30C4u16.to_le_bytes());
    data.push(3);
    data.extend_from_slice(&0i32.to_le_bytes());
    data.push(2);
    data.extend_from_slice(&4u32.to_le_bytes());
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(b"abcd");
    std::fs::write(&path, &data)?;

    let mappings = TypeMappings::open(&path)?;
    assert_eq!(mappings.path(), path.as_path());
    assert_eq!(mappings.version(), 3);
    assert_eq!(mappings.decompressed_size(), 16);
    Ok(())
}
