use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::constants::render_settings::{DAY_NIGHT_NOTIFY_INTERVAL_SECS, FPS_NOTIFY_INTERVAL_SECS};
use crate::engine::core::app_state::FpsText;
use crate::engine::systems::day_night::DayNightCycle;
use crate::rpc::web_rpc::{WebRpcInterface, time_of_day_json};

/// Returns true and restarts the interval once `interval` seconds have passed.
fn interval_elapsed(last_send_time: &mut f32, current_time: f32, interval: f32) -> bool {
    if current_time - *last_send_time >= interval {
        *last_send_time = current_time;
        true
    } else {
        false
    }
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL_SECS {
        return;
    }

    if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
        if let Some(value) = fps.smoothed() {
            rpc_interface.send_notification(
                "fps_update",
                serde_json::json!({
                    "fps": value as f32
                }),
            );
            *last_send_time = current_time;
        }
    }
}

pub fn day_night_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    cycle: Res<DayNightCycle>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    if interval_elapsed(
        &mut last_send_time,
        time.elapsed_secs(),
        DAY_NIGHT_NOTIFY_INTERVAL_SECS,
    ) {
        rpc_interface.send_notification("day_night_update", time_of_day_json(&cycle));
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::diagnostic::{Diagnostic, Diagnostics, RegisterDiagnostic};
    use std::time::Duration;

    fn report_sixty_fps(mut diagnostics: Diagnostics) {
        diagnostics.add_measurement(&FrameTimeDiagnosticsPlugin::FPS, || 60.0);
    }

    #[test]
    fn interval_gate_fires_once_per_period() {
        let mut last = 0.0;
        assert!(!interval_elapsed(&mut last, 0.4, 1.0));
        assert!(interval_elapsed(&mut last, 1.0, 1.0));
        assert_eq!(last, 1.0);
        assert!(!interval_elapsed(&mut last, 1.5, 1.0));
        assert!(interval_elapsed(&mut last, 2.2, 1.0));
    }

    #[test]
    fn day_night_updates_are_throttled() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<WebRpcInterface>()
            .insert_resource(DayNightCycle::new(60.0, 0.5))
            .add_systems(Update, day_night_notification_system);

        for _ in 0..25 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(100));
            app.update();
        }

        let rpc = app.world().resource::<WebRpcInterface>();
        let updates = rpc.pending_notifications("day_night_update");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["phase"], serde_json::json!(0.5));
    }

    #[test]
    fn fps_is_reported_twice_a_second() {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<WebRpcInterface>()
            .register_diagnostic(Diagnostic::new(FrameTimeDiagnosticsPlugin::FPS))
            .add_systems(Update, (report_sixty_fps, fps_notification_system).chain());

        for _ in 0..12 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(100));
            app.update();
        }

        let rpc = app.world().resource::<WebRpcInterface>();
        let updates = rpc.pending_notifications("fps_update");
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0]["fps"], serde_json::json!(60.0));
    }
}
