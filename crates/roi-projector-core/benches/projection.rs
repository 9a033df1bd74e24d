use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::{Rotation3, Vector3};
use roi_projector_core::{
    containment_ratio, project_corners, project_point, project_rect, project_rect_planar,
    Calibration, DepthPixel, Distortion, Extrinsic, Intrinsics, Rect,
};

fn calibration(distorted: bool) -> Calibration {
    let r = Rotation3::from_euler_angles(0.01, -0.03, 0.02);
    let (d1, d2) = if distorted {
        (
            Distortion::from_array([-0.12, 0.03, 0.001, -0.0005, 0.0]),
            Distortion::from_array([0.08, -0.02, -0.0008, 0.0004, 0.001]),
        )
    } else {
        (Distortion::ZERO, Distortion::ZERO)
    };
    Calibration {
        extrinsic: Extrinsic::from_parts(*r.matrix(), Vector3::new(-50.0, 2.0, 5.0)),
        camera1: Intrinsics::from_params(580.0, 580.0, 320.0, 240.0),
        camera2: Intrinsics::from_params(1400.0, 1400.0, 960.0, 540.0),
        distortion1: d1,
        distortion2: d2,
    }
}

fn bench_point(c: &mut Criterion) {
    let plain = calibration(false);
    let distorted = calibration(true);

    c.bench_function("project_point_pinhole", |b| {
        b.iter(|| project_point(black_box(&plain), black_box(210.0), black_box(130.0), 900.0))
    });
    c.bench_function("project_point_distorted", |b| {
        b.iter(|| {
            project_point(
                black_box(&distorted),
                black_box(210.0),
                black_box(130.0),
                900.0,
            )
        })
    });
}

fn bench_regions(c: &mut Criterion) {
    let calib = calibration(true);
    let corners = [
        DepthPixel::new(100.0, 200.0, 1000.0),
        DepthPixel::new(400.0, 200.0, 1010.0),
        DepthPixel::new(400.0, 350.0, 1020.0),
        DepthPixel::new(100.0, 350.0, 1005.0),
    ];
    let rect = Rect::new(100.0, 200.0, 300.0, 150.0);

    c.bench_function("project_corners", |b| {
        b.iter(|| project_corners(black_box(&calib), black_box(&corners)))
    });
    c.bench_function("project_rect", |b| {
        b.iter(|| project_rect(black_box(&calib), black_box(&rect), 1000.0))
    });
    c.bench_function("project_rect_planar", |b| {
        b.iter(|| project_rect_planar(black_box(&calib), black_box(&rect), 1000.0))
    });
}

fn bench_overlap(c: &mut Criterion) {
    let roi = Rect::new(0.0, 0.0, 100.0, 80.0).corners();
    let target = Rect::new(20.0, 10.0, 100.0, 80.0).corners();
    c.bench_function("containment_ratio", |b| {
        b.iter(|| black_box(containment_ratio(black_box(&roi), black_box(&target))))
    });
}

criterion_group!(benches, bench_point, bench_regions, bench_overlap);
criterion_main!(benches);
