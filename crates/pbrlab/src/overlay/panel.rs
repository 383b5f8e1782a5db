//! The "PBR" control window: one section per group of shading controls.

use crate::app::{DemoState, PanelAction};
use crate::config::VariantFeatures;
use crate::shading::{FresnelModel, GeometryTerm, NormalDistribution, ShadingParams, TextureSetId};

/// Draw the "PBR" window. Widgets only show up when the variant offers them.
pub(super) fn pbr_panel(ctx: &egui::Context, state: &mut DemoState) -> Vec<PanelAction> {
    let mut actions = Vec::new();
    let features = state.features;

    egui::Window::new("PBR")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("{:.1} fps", state.time.fps()));
            ui.separator();

            if features.shapes.len() > 1 {
                shape_selector(ui, state, features, &mut actions);
            }
            if features.texture_combo {
                texture_combo(ui, state, &mut actions);
            }
            if features.material_controls {
                material_controls(ui, state, features.gradient_toggle, &mut actions);
            }
            if features.reflectance_controls {
                ui.separator();
                reflectance_controls(ui, &mut state.shading);
            }
            if features.contribution_toggles {
                ui.horizontal(|ui| {
                    ui.checkbox(&mut state.shading.diffuse, "diffuse");
                    ui.checkbox(&mut state.shading.specular, "specular");
                });
            }

            ui.separator();
            light_controls(ui, state, features, &mut actions);
        });

    actions
}

fn shape_selector(
    ui: &mut egui::Ui,
    state: &DemoState,
    features: VariantFeatures,
    actions: &mut Vec<PanelAction>,
) {
    let mut shape = state.shape;
    ui.horizontal(|ui| {
        for &kind in features.shapes {
            ui.radio_value(&mut shape, kind, kind.label());
        }
    });
    if shape != state.shape {
        actions.push(PanelAction::SetShape(shape));
    }
}

fn texture_combo(ui: &mut egui::Ui, state: &DemoState, actions: &mut Vec<PanelAction>) {
    let library = state.catalog.library();
    let current = state.shading.texture_set();
    let current_name = match current {
        None => "color",
        Some(TextureSetId::Library(i)) => library.get(i).map_or("?", |set| set.name.as_str()),
        Some(TextureSetId::Model) => "model",
    };

    let mut choice = current;
    egui::ComboBox::from_label("texture")
        .selected_text(current_name)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut choice, None, "color");
            for (i, set) in library.iter().enumerate() {
                ui.selectable_value(&mut choice, Some(TextureSetId::Library(i)), set.name.as_str());
            }
        });
    if choice != current {
        actions.push(PanelAction::SelectTexture(choice));
    }
}

fn material_controls(
    ui: &mut egui::Ui,
    state: &DemoState,
    gradient_toggle: bool,
    actions: &mut Vec<PanelAction>,
) {
    let shading = &state.shading;
    let textured = shading.texture_set().is_some();

    if !textured {
        let mut color = shading.color();
        ui.horizontal(|ui| {
            ui.label("albedo");
            if ui.color_edit_button_rgb(&mut color).changed() {
                actions.push(PanelAction::SetColor(color));
            }
        });
    }

    if gradient_toggle {
        let mut gradient = shading.is_gradient();
        let toggle = ui.add_enabled(!textured, egui::Checkbox::new(&mut gradient, "gradient"));
        if toggle.changed() {
            actions.push(PanelAction::SetGradient(gradient));
        }
    }

    // The maps drive roughness and metallic when a texture set is bound.
    if !textured && !shading.is_gradient() {
        let mut roughness = shading.roughness();
        if ui
            .add(egui::Slider::new(&mut roughness, 0.0..=1.0).text("roughness"))
            .changed()
        {
            actions.push(PanelAction::SetRoughness(roughness));
        }
        let mut metallic = shading.metallic();
        if ui
            .add(egui::Slider::new(&mut metallic, 0.0..=1.0).text("metallic"))
            .changed()
        {
            actions.push(PanelAction::SetMetallic(metallic));
        }
    }
}

fn reflectance_controls(ui: &mut egui::Ui, shading: &mut ShadingParams) {
    ui.checkbox(&mut shading.tone_map, "HDR / Gamma Correction");
    ui.add(egui::Slider::new(&mut shading.ambient, 0.0..=0.1).text("ambient"));

    let mut schlick = shading.fresnel == FresnelModel::Schlick;
    if ui.checkbox(&mut schlick, "Schlick Fresnel").changed() {
        shading.fresnel = if schlick {
            FresnelModel::Schlick
        } else {
            FresnelModel::Constant
        };
    }
    ui.add(egui::Slider::new(&mut shading.f0, 0.0..=1.0).text("F0"));

    egui::ComboBox::from_label("NDF")
        .selected_text(shading.ndf.label())
        .show_ui(ui, |ui| {
            for ndf in NormalDistribution::ALL {
                ui.selectable_value(&mut shading.ndf, ndf, ndf.label());
            }
        });
    egui::ComboBox::from_label("Geometry")
        .selected_text(shading.geometry.label())
        .show_ui(ui, |ui| {
            for term in GeometryTerm::ALL {
                ui.selectable_value(&mut shading.geometry, term, term.label());
            }
        });
}

fn light_controls(
    ui: &mut egui::Ui,
    state: &DemoState,
    features: VariantFeatures,
    actions: &mut Vec<PanelAction>,
) {
    let lights = &state.lights;

    let mut enabled = lights.enabled();
    if ui.checkbox(&mut enabled, "light").changed() {
        actions.push(PanelAction::SetLightsEnabled(enabled));
    }

    let mut color = lights.chosen_color();
    ui.horizontal(|ui| {
        ui.label("light color");
        if ui.color_edit_button_rgb(&mut color).changed() {
            actions.push(PanelAction::SetLightColor(color));
        }
    });

    if features.motions.len() > 1 {
        let mut motion = lights.motion();
        ui.horizontal(|ui| {
            for &mode in features.motions {
                ui.radio_value(&mut motion, mode, mode.label());
            }
        });
        if motion != lights.motion() {
            actions.push(PanelAction::SetMotion(motion));
        }
    }

    if features.light_sliders {
        let mut speed = lights.speed();
        if ui
            .add(egui::Slider::new(&mut speed, 0.0..=5.0).text("speed"))
            .changed()
        {
            actions.push(PanelAction::SetSpeed(speed));
        }

        let (mut distance, mut depth) = (lights.distance(), lights.depth());
        let distance_changed = ui
            .add(egui::Slider::new(&mut distance, 0.0..=20.0).text("distance"))
            .changed();
        let depth_changed = ui
            .add(egui::Slider::new(&mut depth, -10.0..=30.0).text("depth"))
            .changed();
        if distance_changed || depth_changed {
            actions.push(PanelAction::SetLayout { distance, depth });
        }
    }
}
