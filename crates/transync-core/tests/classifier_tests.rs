//! Table tests for pairing classification

use chrono::Utc;
use proptest::prelude::*;
use rstest::rstest;
use transync_core::{
    FileSnapshot, FsStateKind, Resolution, Stage, StoreFs, StoreSnapshot, Watermark, classify_pairing,
};

const SYNCED_REV: u64 = 5;
const SYNCED_HASH: &str = "sha256:aaaa";

fn row(stage: Stage, synced: bool) -> StoreFs {
    let mut row = StoreFs::new("/en/proj/foo.po", "/en/foo.po", stage);
    if synced {
        row.watermark = Some(Watermark {
            revision: SYNCED_REV,
            hash: SYNCED_HASH.to_string(),
            synced_at: Utc::now(),
        });
    }
    row
}

fn store(revision: u64) -> StoreSnapshot {
    StoreSnapshot {
        pootle_path: "/en/proj/foo.po".to_string(),
        revision,
        obsolete: false,
    }
}

fn obsolete_store() -> StoreSnapshot {
    StoreSnapshot {
        obsolete: true,
        ..store(SYNCED_REV)
    }
}

fn file(hash: &str) -> FileSnapshot {
    FileSnapshot::new("/en/foo.po", Some(hash.to_string()))
}

const MERGE_FS: Stage = Stage::Merge {
    resolution: Resolution::FsWins,
};
const MERGE_POOTLE: Stage = Stage::Merge {
    resolution: Resolution::PootleWins,
};

#[rstest]
#[case::fs_untracked(None, None, Some(file("sha256:x")), Some(FsStateKind::FsUntracked))]
#[case::pootle_untracked(None, Some(store(1)), None, Some(FsStateKind::PootleUntracked))]
#[case::conflict_untracked(None, Some(store(1)), Some(file("sha256:x")), Some(FsStateKind::ConflictUntracked))]
#[case::untracked_obsolete_store(None, Some(obsolete_store()), None, None)]
#[case::nothing(None, None, None, None)]
#[case::fs_staged(Some(row(Stage::Fetch, false)), None, Some(file("sha256:x")), Some(FsStateKind::FsStaged))]
#[case::pootle_staged(Some(row(Stage::Add, false)), Some(store(1)), None, Some(FsStateKind::PootleStaged))]
#[case::add_over_existing_file(Some(row(Stage::Add, false)), Some(store(1)), Some(file("sha256:x")), Some(FsStateKind::PootleStaged))]
#[case::fetch_over_existing_store(Some(row(Stage::Fetch, false)), Some(store(1)), Some(file("sha256:x")), Some(FsStateKind::FsStaged))]
#[case::fs_ahead(Some(row(Stage::Tracked, true)), Some(store(SYNCED_REV)), Some(file("sha256:new")), Some(FsStateKind::FsAhead))]
#[case::pootle_ahead(Some(row(Stage::Tracked, true)), Some(store(SYNCED_REV + 1)), Some(file(SYNCED_HASH)), Some(FsStateKind::PootleAhead))]
#[case::conflict(Some(row(Stage::Tracked, true)), Some(store(SYNCED_REV + 1)), Some(file("sha256:new")), Some(FsStateKind::Conflict))]
#[case::fs_removed(Some(row(Stage::Tracked, true)), Some(store(SYNCED_REV)), None, Some(FsStateKind::FsRemoved))]
#[case::pootle_removed(Some(row(Stage::Tracked, true)), Some(obsolete_store()), Some(file(SYNCED_HASH)), Some(FsStateKind::PootleRemoved))]
#[case::pootle_removed_missing_store(Some(row(Stage::Tracked, true)), None, Some(file(SYNCED_HASH)), Some(FsStateKind::PootleRemoved))]
#[case::merge_fs_wins(Some(row(MERGE_FS, true)), Some(store(SYNCED_REV + 1)), Some(file("sha256:new")), Some(FsStateKind::MergeFsWins))]
#[case::merge_pootle_wins(Some(row(MERGE_POOTLE, true)), Some(store(SYNCED_REV + 1)), Some(file("sha256:new")), Some(FsStateKind::MergePootleWins))]
#[case::remove_overrides(Some(row(Stage::Remove, true)), Some(store(SYNCED_REV + 1)), Some(file("sha256:new")), Some(FsStateKind::Remove))]
#[case::orphan_row(Some(row(Stage::Tracked, true)), None, None, Some(FsStateKind::Remove))]
#[case::in_sync(Some(row(Stage::Tracked, true)), Some(store(SYNCED_REV)), Some(file(SYNCED_HASH)), None)]
fn classify_table(
    #[case] store_fs: Option<StoreFs>,
    #[case] store: Option<StoreSnapshot>,
    #[case] file: Option<FileSnapshot>,
    #[case] expected: Option<FsStateKind>,
) {
    assert_eq!(
        classify_pairing(store_fs.as_ref(), store.as_ref(), file.as_ref()),
        expected
    );
}

fn arb_stage() -> impl Strategy<Value = Stage> {
    prop_oneof![
        Just(Stage::Tracked),
        Just(Stage::Add),
        Just(Stage::Fetch),
        Just(Stage::Remove),
        Just(MERGE_FS),
        Just(MERGE_POOTLE),
    ]
}

proptest! {
    /// Untracked pairings get an untracked state, tracked ones never do,
    /// and the only stateless tracked pairing is an unchanged synced one.
    #[test]
    fn classification_respects_tracking(
        tracked in any::<bool>(),
        stage in arb_stage(),
        synced in any::<bool>(),
        store_state in 0u8..3,
        revision_drift in any::<bool>(),
        file_state in 0u8..3,
    ) {
        let store_fs = tracked.then(|| row(stage, synced));
        let revision = if revision_drift { SYNCED_REV + 1 } else { SYNCED_REV };
        let store = match store_state {
            0 => None,
            1 => Some(obsolete_store()),
            _ => Some(store(revision)),
        };
        let file = match file_state {
            0 => None,
            1 => Some(file(SYNCED_HASH)),
            _ => Some(file("sha256:other")),
        };

        let kind = classify_pairing(store_fs.as_ref(), store.as_ref(), file.as_ref());
        let live = store.as_ref().is_some_and(StoreSnapshot::exists);

        match (&store_fs, kind) {
            (None, Some(kind)) => prop_assert!(!kind.is_tracked()),
            (None, None) => prop_assert!(!live && file.is_none()),
            (Some(_), Some(kind)) => prop_assert!(kind.is_tracked()),
            (Some(row), None) => {
                prop_assert_eq!(row.stage, Stage::Tracked);
                prop_assert!(row.watermark.is_some());
                prop_assert!(live && !revision_drift && file_state == 1);
            }
        }
    }
}
