pub mod galaxy_vis3d;
