pub mod accessor;
pub mod array;
pub mod axis;
pub mod bin;
pub mod dimensions;
pub mod scale;
pub mod time_interval;

pub use accessor::{
    Accessor, DateAccessor, FieldAccessor, FnAccessor, Record, TextAccessor, collect_defined,
    require,
};
pub use axis::{Axis, AxisOrient, AxisStyle, AxisTick, tick_count_for_span};
pub use bin::{Bin, Binner, Thresholds};
pub use dimensions::{Dimensions, Margin, ResponsiveDimensions};
pub use scale::{
    BandScale, ColorInterpolator, ColorScale, ColorSpace, ContinuousScale, DivergingScale,
    DomainValue, LinearScale, OrdinalScale, SequentialScale, TimeScale,
};
pub use time_interval::{TimeInterval, TimeUnit};
