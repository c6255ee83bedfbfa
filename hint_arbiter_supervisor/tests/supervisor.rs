use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use hint_arbiter_core::{
    ArbiterCfg, CombinedMode, HintStatus, LockHandle, PerfLock, PowerHint, ProfileId, ResourceValue,
};
use hint_arbiter_supervisor::*;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Op {
    Acquire(ProfileId, u32),
    Release(i32),
    Perform(ProfileId),
    Undo(ProfileId),
}

/// Perf-lock backend that logs into a shared vector the test keeps a handle to.
struct SharedLock {
    ops: Rc<RefCell<Vec<Op>>>,
    next: i32,
}

impl PerfLock for SharedLock {
    fn acquire(&mut self, _existing: LockHandle, duration_ms: u32, resources: &[ResourceValue]) -> LockHandle {
        self.ops.borrow_mut().push(Op::Acquire(ProfileId(resources[0].value), duration_ms));
        self.next += 1;
        LockHandle(self.next)
    }

    fn release(&mut self, handle: LockHandle) {
        self.ops.borrow_mut().push(Op::Release(handle.0));
    }

    fn perform(&mut self, id: ProfileId, _resources: &[ResourceValue]) {
        self.ops.borrow_mut().push(Op::Perform(id));
    }

    fn undo(&mut self, id: ProfileId) {
        self.ops.borrow_mut().push(Op::Undo(id));
    }
}

fn profiles() -> StaticProfiles {
    // Resource value carries the profile id so acquires can be attributed.
    let mut p = StaticProfiles::new();
    for id in [
        ProfileId::SUSTAINED_PERF,
        ProfileId::VR_MODE,
        ProfileId::VR_MODE_SUSTAINED_PERF,
        ProfileId::BOOST,
        ProfileId::CAMERA_LAUNCH,
        ProfileId::DEFAULT_VIDEO_ENCODE,
    ] {
        p.insert(id, vec![ResourceValue::new(0x4180_0000, id.0)]);
    }
    p
}

fn supervisor(governor_root: &std::path::Path) -> (HintSupervisor, Rc<RefCell<Vec<Op>>>) {
    let ops = Rc::new(RefCell::new(Vec::new()));
    let lock = SharedLock { ops: ops.clone(), next: 0 };
    let env = HalEnv::new(Box::new(profiles()), Box::new(lock))
        .with_governor(Box::new(SysfsGovernor::new(governor_root)));
    (HintSupervisor::new(ArbiterCfg::default(), env), ops)
}

fn sysfs_with_governor(name: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sys/devices/system/cpu/cpufreq/policy0");
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("scaling_governor"), format!("{name}\n")).unwrap();
    dir
}

#[test]
fn unrecognized_hints_are_ignored() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, ops) = supervisor(dir.path());

    // Interaction (2) and low-power (5) are not arbitrated here.
    assert_eq!(sup.power_hint(2, HintData::Present), HintStatus::NotHandled);
    assert_eq!(sup.power_hint(5, HintData::Int(1)), HintStatus::NotHandled);
    assert_eq!(sup.power_hint(0xdead, HintData::Absent), HintStatus::NotHandled);
    assert!(ops.borrow().is_empty());
    assert_eq!(sup.snapshot().mode, CombinedMode::Off);
}

#[test]
fn raw_mode_hints_drive_the_overlay() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, ops) = supervisor(dir.path());

    assert_eq!(sup.power_hint(PowerHint::SustainedPerformance.raw(), HintData::Present), HintStatus::Handled);
    assert_eq!(sup.power_hint(PowerHint::VrMode.raw(), HintData::Present), HintStatus::Handled);
    assert!(sup.is_hint_active(ProfileId::VR_MODE_SUSTAINED_PERF));

    // Launch boosts never compete with the modes.
    assert_eq!(sup.power_hint(PowerHint::Launch.raw(), HintData::Present), HintStatus::Handled);

    assert_eq!(sup.power_hint(PowerHint::VrMode.raw(), HintData::Absent), HintStatus::Handled);
    assert!(sup.is_hint_active(ProfileId::SUSTAINED_PERF));
    assert!(!sup.is_hint_active(ProfileId::VR_MODE));

    assert_eq!(
        *ops.borrow(),
        vec![
            Op::Acquire(ProfileId::SUSTAINED_PERF, 0),
            Op::Release(1),
            Op::Acquire(ProfileId::VR_MODE_SUSTAINED_PERF, 0),
            Op::Release(2),
            Op::Acquire(ProfileId::SUSTAINED_PERF, 0),
        ]
    );
}

#[test]
fn camera_hint_needs_a_duration() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, ops) = supervisor(dir.path());

    assert_eq!(sup.power_hint(PowerHint::CameraLaunch.raw(), HintData::Absent), HintStatus::NotHandled);
    assert_eq!(sup.power_hint(PowerHint::CameraLaunch.raw(), HintData::Int(500)), HintStatus::Handled);
    assert_eq!(sup.power_hint(PowerHint::CameraLaunch.raw(), HintData::Int(0)), HintStatus::Handled);
    assert_eq!(*ops.borrow(), vec![Op::Acquire(ProfileId::CAMERA_LAUNCH, 500), Op::Release(1)]);
}

#[test]
fn video_encode_uses_sysfs_governor_and_stock_parser() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, ops) = supervisor(dir.path());
    let hint = PowerHint::VideoEncode.raw();

    assert_eq!(sup.power_hint(hint, HintData::Text("state=1:hint_id=0x0A00")), HintStatus::Handled);
    assert_eq!(sup.power_hint(hint, HintData::Text("state=0:hint_id=0x0A00")), HintStatus::Handled);
    assert_eq!(
        *ops.borrow(),
        vec![
            Op::Acquire(ProfileId::BOOST, 2000),
            Op::Perform(ProfileId::DEFAULT_VIDEO_ENCODE),
            Op::Undo(ProfileId::DEFAULT_VIDEO_ENCODE),
        ]
    );
}

#[test]
fn video_encode_without_governor_is_not_handled() {
    let dir = tempfile::tempdir().unwrap();
    let (mut sup, ops) = supervisor(dir.path());

    let status = sup.power_hint(PowerHint::VideoEncode.raw(), HintData::Text("state=1"));
    assert_eq!(status, HintStatus::NotHandled);
    assert!(ops.borrow().is_empty());
}

#[test]
fn snapshot_serializes() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, _ops) = supervisor(dir.path());
    sup.power_hint(PowerHint::VrMode.raw(), HintData::Present);

    let snap = sup.snapshot();
    assert_eq!(snap.mode, CombinedMode::Vr);
    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["mode"], "Vr");
    assert_eq!(json["state"]["modes"]["vr"], true);
    assert_eq!(json["cfg"]["launch_boost_ms"], 5000);

    let back: ArbiterSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn set_interactive_is_handled() {
    let dir = sysfs_with_governor("interactive");
    let (mut sup, ops) = supervisor(dir.path());
    assert_eq!(sup.set_interactive(false), HintStatus::Handled);
    assert!(ops.borrow().is_empty());
}
