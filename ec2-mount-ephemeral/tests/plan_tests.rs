use ec2_mount_ephemeral::plan::{self, StageKind, DRY_RUN_NOTICE};
use ec2_mount_ephemeral::{discovered_devices, MountError, RunConfig};
use mount_hal::{AbsenceReason, Discovery, FakeHal, HalError, Operation};
use std::path::PathBuf;
use std::time::Duration;

fn nvme() -> Vec<PathBuf> {
    vec![PathBuf::from("/dev/nvme1n1")]
}

fn programs(hal: &FakeHal) -> Vec<String> {
    hal.operations()
        .iter()
        .filter_map(|op| op.program().map(String::from))
        .collect()
}

#[test]
fn dry_run_prints_plan_and_executes_nothing() {
    let hal = FakeHal::new();
    let mut out = Vec::new();

    plan::run(&nvme(), &RunConfig::new("/instance"), &hal, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "mkfs -V -t ext4 /dev/nvme1n1",
            "fsck -M -y -V /dev/nvme1n1",
            "mount -o defaults -t ext4 /dev/nvme1n1 /instance",
            DRY_RUN_NOTICE,
        ]
    );
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn execute_runs_all_stages_in_order() {
    let hal = FakeHal::new();
    let mut out = Vec::new();
    let config = RunConfig::new("/instance").with_fs_type("xfs").execute();

    plan::run(&nvme(), &config, &hal, &mut out).unwrap();

    assert!(out.is_empty());
    assert_eq!(
        hal.operations(),
        vec![
            Operation::Command {
                argv: ["mkfs", "-V", "-t", "xfs", "/dev/nvme1n1"]
                    .map(String::from)
                    .to_vec(),
            },
            Operation::Command {
                argv: ["fsck", "-M", "-y", "-V", "/dev/nvme1n1"]
                    .map(String::from)
                    .to_vec(),
            },
            Operation::Command {
                argv: ["mount", "-o", "defaults", "-t", "xfs", "/dev/nvme1n1", "/instance"]
                    .map(String::from)
                    .to_vec(),
            },
        ]
    );
}

#[test]
fn failing_stage_aborts_remaining_stages() {
    let hal = FakeHal::new();
    hal.fail_program("fsck", 8);
    let mut out = Vec::new();

    let err = plan::run(&nvme(), &RunConfig::new("/instance").execute(), &hal, &mut out)
        .unwrap_err();

    assert_eq!(programs(&hal), vec!["mkfs", "fsck"]);
    match &err {
        MountError::StageFailed {
            stage,
            command,
            source,
        } => {
            assert_eq!(*stage, StageKind::Check);
            assert_eq!(command, "fsck -M -y -V /dev/nvme1n1");
            assert!(matches!(source, HalError::CommandFailed { code: Some(8), .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("fsck -M -y -V /dev/nvme1n1"));
    assert!(!err.is_timeout());
}

#[test]
fn zero_timeout_fails_first_stage_with_timeout() {
    let hal = FakeHal::new();
    let mut out = Vec::new();
    let config = RunConfig::new("/instance")
        .with_timeout(Duration::ZERO)
        .execute();

    let err = plan::run(&nvme(), &config, &hal, &mut out).unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(
        err,
        MountError::StageFailed {
            stage: StageKind::Format,
            ..
        }
    ));
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn zero_timeout_still_allows_dry_run() {
    let hal = FakeHal::new();
    let mut out = Vec::new();
    let config = RunConfig::new("/instance").with_timeout(Duration::ZERO);

    plan::run(&nvme(), &config, &hal, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
}

#[test]
fn huge_timeout_is_accepted_in_both_modes() {
    let hal = FakeHal::new();
    let config = RunConfig::new("/instance").with_timeout(Duration::from_secs(u64::MAX));

    let mut out = Vec::new();
    plan::run(&nvme(), &config, &hal, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);

    let mut out = Vec::new();
    plan::run(&nvme(), &config.execute(), &hal, &mut out).unwrap();
    assert_eq!(programs(&hal), vec!["mkfs", "fsck", "mount"]);
}

#[test]
fn non_utf8_mount_path_is_rejected_before_planning() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let hal = FakeHal::new();
    let mut out = Vec::new();
    let mount_path = PathBuf::from(OsStr::from_bytes(b"/inst\xffance"));

    let err = plan::run(&nvme(), &RunConfig::new(mount_path).execute(), &hal, &mut out)
        .unwrap_err();

    assert!(matches!(err, MountError::InvalidConfig(_)));
    assert!(out.is_empty());
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn no_devices_is_fatal() {
    let hal = FakeHal::new();
    let mut out = Vec::new();

    let err = plan::run(&[], &RunConfig::new("/instance").execute(), &hal, &mut out).unwrap_err();

    assert!(matches!(err, MountError::NoDevices));
    assert_eq!(err.to_string(), "No ephemeral devices found.");
    assert!(out.is_empty());
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn multiple_devices_are_rejected() {
    let hal = FakeHal::new();
    let mut out = Vec::new();
    let devices = vec![PathBuf::from("/dev/nvme1n1"), PathBuf::from("/dev/nvme2n1")];

    let err = plan::run(&devices, &RunConfig::new("/instance"), &hal, &mut out).unwrap_err();

    assert!(matches!(err, MountError::TooManyDevices(2)));
    assert!(out.is_empty());
}

#[test]
fn ambiguous_absence_counts_as_no_devices() {
    let discovery = Discovery::AmbiguousAbsence {
        entry: PathBuf::from("/dev/disk/by-id/nvme-Amazon_EC2_NVMe_Instance_Storage_vol0"),
        reason: AbsenceReason::Vanished,
    };
    let devices = discovered_devices(discovery);
    assert!(devices.is_empty());

    let hal = FakeHal::new();
    let mut out = Vec::new();
    let err = plan::run(&devices, &RunConfig::new("/instance"), &hal, &mut out).unwrap_err();
    assert!(matches!(err, MountError::NoDevices));
}

#[test]
fn found_devices_pass_through_unchanged() {
    let devices = discovered_devices(Discovery::Found(nvme()));
    assert_eq!(devices, nvme());
}
