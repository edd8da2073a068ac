mod ring_buffer;
pub use ring_buffer::RingBuffer;

mod rolling_sum;
pub use rolling_sum::RollingSum;
