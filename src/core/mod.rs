pub mod area_series;
pub mod candlestick;
pub mod events;
pub mod histogram_series;
pub mod line_series;
pub mod pane;
pub mod plot;
pub mod price_scale;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod timeframe;
pub mod types;

pub use area_series::{AreaVertex, BandGeometry, BandPoint, project_band_geometry};
pub use candlestick::{CandleGeometry, OhlcBar, project_candles};
pub use events::{
    ChartEvent, ChartPattern, EventCategory, EventSeverity, PatternBias, PatternStrength,
};
pub use histogram_series::{BarTone, HistogramBar, HistogramPoint, project_histogram_bars};
pub use line_series::{
    LinePoint, LineSegment, project_line_segments, project_line_segments_split_at,
};
pub use pane::{PaneCollection, PaneDescriptor, PaneId, PaneLayoutRegion, PaneRole};
pub use plot::{PlotContext, min_time_spacing};
pub use price_scale::{PriceScale, PriceScaleId, PriceScaleOptions, ScaleFit};
pub use primitives::{
    clamp_visual, datetime_to_unix_seconds, decimal_to_f64, unix_seconds_to_datetime,
};
pub use scale::{LinearScale, PixelRange};
pub use time_scale::{TimeScale, TimeScaleTuning};
pub use timeframe::Timeframe;
pub use types::{ChartPoint, EmotionSnapshot, Viewport, is_strictly_ascending};
