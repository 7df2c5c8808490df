pub mod controls_ui;
pub mod detail_ui;
pub mod panel_trait;
pub mod scatter_ui;

pub use controls_ui::ControlsPanel;
pub use detail_ui::DetailPanel;
pub use panel_trait::{Panel, PanelState, UiAction};
pub use scatter_ui::{PainterCanvas, ScatterStyle, ScatterView};
