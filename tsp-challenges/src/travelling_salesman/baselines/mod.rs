pub mod nearest_neighbour;
