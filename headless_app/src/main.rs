//! Headless pipeline demo
//!
//! Drives the full pipeline lifecycle without a GPU: init, a few UI
//! frames through the snapshot ring (main window plus one child
//! viewport), a flush barrier, and a draining shutdown. Run with
//! `RUST_LOG=debug` to watch the command stream on the render thread.

use render_core::prelude::*;
use render_core::ui::{UiDrawCall, UiDrawList, UiDrawVertex};

const FRAMES: u64 = 10;

fn main() {
    env_logger::init();

    let config = PipelineConfig::new()
        .with_snapshot_slots(3)
        .with_thread_name("render-thread");

    let context = HeadlessContext::new();
    let counters = context.counters();

    let pipeline = match RenderPipeline::init(config, Box::new(context)) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log::error!("failed to start render pipeline: {e}");
            std::process::exit(1);
        }
    };

    let mut ui = UiEngine::new();
    let main_window = ui.init(&pipeline);
    let tools_window = ui.open_window(
        &pipeline,
        Some(Viewport::new("tools", 480, 320)),
        UiWindowFlags::empty(),
    );

    for frame in 0..FRAMES {
        ui.begin_frame();

        build_demo_frame(ui.window_mut(main_window).expect("main window").current_mut(), frame, [1280.0, 720.0]);
        build_demo_frame(ui.window_mut(tools_window).expect("tools window").current_mut(), frame, [480.0, 320.0]);

        ui.end_frame(&pipeline);
    }

    // Completion guarantee before inspecting the counters.
    pipeline.flush();
    log::info!(
        "rendered {FRAMES} frames: {} UI draws, {} viewport passes, {} clears",
        counters.ui_draws(),
        counters.viewports_begun(),
        counters.surfaces_cleared()
    );

    ui.shutdown(&pipeline);
    if let Err(e) = pipeline.shutdown() {
        log::error!("pipeline shutdown failed: {e}");
        std::process::exit(1);
    }
    log::info!("clean shutdown");
}

/// Build one frame of synthetic draw output: a single moving quad
fn build_demo_frame(draw_data: &mut UiDrawData, frame: u64, display_size: [f32; 2]) {
    let offset = (frame * 8) as f32;
    let quad = |x: f32, y: f32| UiDrawVertex {
        position: [x, y],
        uv: [0.0, 0.0],
        color: [255, 255, 255, 255],
    };

    draw_data.display_pos = [0.0, 0.0];
    draw_data.display_size = display_size;
    draw_data.lists.push(UiDrawList {
        vertices: vec![
            quad(offset, offset),
            quad(offset + 32.0, offset),
            quad(offset + 32.0, offset + 32.0),
            quad(offset, offset + 32.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
        calls: vec![UiDrawCall {
            clip_rect: [0.0, 0.0, display_size[0], display_size[1]],
            texture_id: 0,
            index_offset: 0,
            element_count: 6,
        }],
    });
}
