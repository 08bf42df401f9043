// Copy to ~/.config/hybridimg/config.rhai.rs
// Every variable is optional; command line flags win over these.

let first = "data/fish.bmp";
let second = "data/submarine.bmp";

let levels = 8;
let max_zoom = min(levels, 4);

// 1: first image is closer, 2: second image is closer
// let select = 1;

let save = "hybrid.png";
